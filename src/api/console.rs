use super::{ApiError, SegmentApi};
use crate::model::{ClientConfig, CreatedSegment, RawOption, SubmissionPayload};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Url};

const OPTIONS_PATH: &str = "datasets/documents/segments/extendedDataApi";

/// HTTP client for the dataset console API.
#[derive(Clone)]
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ConsoleClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'.
        let mut base = cfg.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).with_context(|| format!("invalid base URL {base}"))?;

        let mut headers = header::HeaderMap::new();
        if let Some(token) = cfg.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .context("token contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .default_headers(headers)
            .timeout(cfg.timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn options_url(&self) -> Url {
        // OPTIONS_PATH is a static relative path; joining cannot fail.
        self.base_url
            .join(OPTIONS_PATH)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    pub fn segment_url(&self, dataset_id: &str, document_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["datasets", dataset_id, "documents", document_id, "segment"]);
        }
        url
    }
}

/// Turn a non-success response into `ApiError::Status`, keeping the body for diagnostics.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SegmentApi for ConsoleClient {
    async fn fetch_options(&self) -> Result<Vec<RawOption>, ApiError> {
        let url = self.options_url();
        tracing::debug!(%url, "fetching extended data options");
        let resp = check_status(self.http.get(url).send().await?).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn add_segment(
        &self,
        dataset_id: &str,
        document_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<CreatedSegment, ApiError> {
        let url = self.segment_url(dataset_id, document_id);
        tracing::debug!(%url, "adding segment");
        let resp = check_status(self.http.post(url).json(payload).send().await?).await?;
        let bytes = resp.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(CreatedSegment::default());
        }
        // The segment exists once the status is 2xx; an odd body must not
        // turn that into a failure.
        match serde_json::from_slice(&bytes) {
            Ok(created) => Ok(created),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable add-segment response body");
                Ok(CreatedSegment::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{DialogHost, DialogProps, SegmentDialog};
    use crate::model::{Notice, SegmentTarget};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::time::Duration;

    fn cfg(base_url: &str, token: Option<&str>) -> ClientConfig {
        ClientConfig {
            base_url: base_url.into(),
            token: token.map(str::to_string),
            timeout: Duration::from_secs(5),
            user_agent: "segment-studio/test".into(),
        }
    }

    #[test]
    fn options_url_keeps_base_path() {
        let client = ConsoleClient::new(&cfg("http://localhost:5001/console/api", None)).unwrap();
        assert_eq!(
            client.options_url().as_str(),
            "http://localhost:5001/console/api/datasets/documents/segments/extendedDataApi"
        );
    }

    #[test]
    fn segment_url_encodes_ids() {
        let client =
            ConsoleClient::new(&cfg("http://localhost:5001/console/api/", Some("tok"))).unwrap();
        assert_eq!(
            client.segment_url("ds-1", "doc 2").as_str(),
            "http://localhost:5001/console/api/datasets/ds-1/documents/doc%202/segment"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(ConsoleClient::new(&cfg("not a url", None)).is_err());
    }

    /// Answer one request with a canned response; the raw request text is
    /// sent back on the returned channel.
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(request);
        });
        (format!("http://{addr}/console/api"), rx)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn payload() -> SubmissionPayload {
        SubmissionPayload {
            content: "body".into(),
            answer: None,
            extended_data: None,
            keywords: None,
        }
    }

    #[tokio::test]
    async fn add_segment_accepts_null_keywords() {
        let (base, requests) = serve_once(
            "200 OK",
            r#"{"data":{"id":"seg-1","content":"body","keywords":null},"doc_form":"text_model"}"#,
        );
        let client = ConsoleClient::new(&cfg(&base, Some("tok"))).unwrap();
        let created = client.add_segment("ds", "doc", &payload()).await.unwrap();
        assert_eq!(created.data.id, "seg-1");
        assert!(created.data.keywords.is_empty());

        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /console/api/datasets/ds/documents/doc/segment "));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer tok"));
        assert!(request.ends_with(r#"{"content":"body"}"#));
    }

    #[tokio::test]
    async fn add_segment_success_survives_unreadable_body() {
        let (base, _requests) = serve_once("201 Created", "<html>ok</html>");
        let client = ConsoleClient::new(&cfg(&base, None)).unwrap();
        let created = client.add_segment("ds", "doc", &payload()).await.unwrap();
        assert_eq!(created.data.id, "");
    }

    #[tokio::test]
    async fn add_segment_empty_body_is_success() {
        let (base, _requests) = serve_once("200 OK", "");
        let client = ConsoleClient::new(&cfg(&base, None)).unwrap();
        assert!(client.add_segment("ds", "doc", &payload()).await.is_ok());
    }

    #[tokio::test]
    async fn add_segment_error_status_keeps_body() {
        let (base, _requests) = serve_once("400 Bad Request", r#"{"message":"bad"}"#);
        let client = ConsoleClient::new(&cfg(&base, None)).unwrap();
        match client.add_segment("ds", "doc", &payload()).await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("bad"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[derive(Default)]
    struct Effects(Vec<String>);

    impl DialogHost for Effects {
        fn notify(&mut self, notice: Notice) {
            self.0.push(format!("notify:{}", notice.key.as_str()));
        }

        fn on_save(&mut self, created: &crate::model::CreatedSegment) {
            self.0.push(format!("save:{}", created.data.id));
        }

        fn on_cancel(&mut self) {
            self.0.push("cancel".into());
        }
    }

    #[tokio::test]
    async fn dialog_closes_after_created_segment_with_null_fields() {
        let (base, _requests) = serve_once(
            "200 OK",
            r#"{"data":{"id":"seg-1","content":null,"keywords":null},"doc_form":"text_model"}"#,
        );
        let client = ConsoleClient::new(&cfg(&base, None)).unwrap();
        let mut dialog = SegmentDialog::new(DialogProps {
            doc_form: "text_model".into(),
            target: SegmentTarget {
                dataset_id: "ds".into(),
                document_id: "doc".into(),
            },
        });
        dialog.activate();
        dialog.store_mut().set_content("body");

        let mut host = Effects::default();
        dialog.submit(&client, &mut host).await;

        assert_eq!(host.0, vec!["notify:segmentAdded", "save:seg-1", "cancel"]);
        assert!(!dialog.is_show());
        assert_eq!(dialog.store().draft().content, "");
    }
}
