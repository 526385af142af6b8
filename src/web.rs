//! The single-page web form: upload a DOCX, get the rewrite back.
//!
//! One linear flow per submitted file, mirroring the pipeline exactly:
//! reset workspace → persist upload → extract → rewrite → (optional)
//! speech → write document → render results with download links. There is
//! no session state; every submission is a fresh run from a blank slate,
//! and the scratch directories from the previous run are purged first.
//!
//! Concurrent submissions against one workspace would corrupt each other's
//! intermediate files. The host is expected to serialise one user session
//! at a time; the handlers do not lock.

use crate::config::ConversionConfig;
use crate::convert::{convert_upload, OUTPUT_AUDIO, OUTPUT_DOCUMENT};
use crate::error::ConvertError;
use crate::workspace::Workspace;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Uploads above this size are rejected before they reach the pipeline.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// MIME type of the generated document.
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Shared handler state: just the conversion configuration.
pub struct AppState {
    config: ConversionConfig,
}

/// Build the application router.
pub fn router(config: ConversionConfig) -> Router {
    let state = Arc::new(AppState { config });
    Router::new()
        .route("/", get(index))
        .route("/convert", post(handle_convert))
        .route("/download/document", get(download_document))
        .route("/download/audio", get(download_audio))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the web UI until the process is stopped.
pub async fn serve(addr: &str, config: ConversionConfig) -> Result<(), ConvertError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ConvertError::Internal(format!("bind {addr}: {e}")))?;
    info!("listening on http://{addr}");

    axum::serve(listener, router(config))
        .await
        .map_err(|e| ConvertError::Internal(format!("server: {e}")))
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn index() -> Html<&'static str> {
    Html(FORM_PAGE)
}

async fn handle_convert(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, WebError> {
    // Pull the uploaded file out of the form. Only the "document" field is
    // meaningful; anything else is ignored.
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::bad_request(format!("malformed upload: {e}")))?
    {
        if field.name() == Some("document") {
            let filename = field
                .file_name()
                .unwrap_or("upload.docx")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| WebError::bad_request(format!("reading upload: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| WebError::bad_request("no file in 'document' field".to_string()))?;

    if !filename.to_lowercase().ends_with(".docx") {
        return Err(WebError::bad_request(format!(
            "expected a .docx file, got '{filename}'"
        )));
    }

    info!(filename = %filename, bytes = bytes.len(), "received upload");

    let output = convert_upload(&filename, &bytes, &state.config)
        .await
        .map_err(|e| {
            error!(error = %e, "conversion failed");
            WebError::internal(e.to_string())
        })?;

    let audio_section = match (&output.audio_path, &output.audio_error) {
        (Some(_), _) => {
            r#"<p><a class="button" href="/download/audio">Download audio (WAV)</a></p>"#
                .to_string()
        }
        (None, Some(detail)) => format!(
            r#"<p class="warn">Speech synthesis failed: {}</p>"#,
            escape_html(detail)
        ),
        (None, None) => String::new(),
    };

    let status_line = if output.rewrite_error.is_none() {
        r#"<p class="ok">Conversion successful!</p>"#.to_string()
    } else {
        r#"<p class="warn">The rewrite service returned an error; details below.</p>"#.to_string()
    };

    Ok(Html(render_result_page(
        &status_line,
        &escape_html(&output.text),
        output.total_tokens,
        output.duration_ms,
        &audio_section,
    )))
}

async fn download_document(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    serve_artifact(&state.config, OUTPUT_DOCUMENT, DOCX_MIME)
}

async fn download_audio(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    serve_artifact(&state.config, OUTPUT_AUDIO, "audio/wav")
}

/// Read one artifact from the output scratch directory and stream it back
/// as an attachment.
fn serve_artifact(
    config: &ConversionConfig,
    name: &str,
    mime: &str,
) -> Result<Response, WebError> {
    let path = Workspace::new(&config.workspace_root)
        .output_dir()
        .join(name);

    let bytes = std::fs::read(&path).map_err(|_| {
        WebError::new(
            StatusCode::NOT_FOUND,
            format!("no '{name}' artifact; convert a document first"),
        )
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ── Error rendering ──────────────────────────────────────────────────────

/// A handler failure rendered as a minimal HTML error page.
pub struct WebError {
    status: StatusCode,
    message: String,
}

impl WebError {
    fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }

    fn bad_request(message: String) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = format!(
            "<!doctype html><title>Error</title><h1>{}</h1><p>{}</p><p><a href=\"/\">Back</a></p>",
            self.status,
            escape_html(&self.message)
        );
        (self.status, Html(body)).into_response()
    }
}

/// Minimal HTML escaping for user-controlled text.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── Pages ────────────────────────────────────────────────────────────────

const FORM_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>LaTeX and Code to Human-Readable Text Converter</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 3rem auto; padding: 0 1rem; }
  .button, button { padding: .5rem 1rem; }
</style>
</head>
<body>
<h1>LaTeX and Code to Human-Readable Text Converter</h1>
<p>Upload a DOCX file with LaTeX content and/or programming code, and get a
human-readable text version.</p>
<form action="/convert" method="post" enctype="multipart/form-data">
  <p><input type="file" name="document" accept=".docx" required></p>
  <p><button type="submit">Convert</button></p>
</form>
</body>
</html>
"#;

/// Render the results page. `status`, `text` and `audio` must already be
/// HTML (escaped where user-controlled).
fn render_result_page(
    status: &str,
    text: &str,
    tokens: usize,
    duration_ms: u64,
    audio: &str,
) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Conversion Result</title>
<style>
  body {{ font-family: system-ui, sans-serif; max-width: 46rem; margin: 3rem auto; padding: 0 1rem; }}
  pre {{ white-space: pre-wrap; background: #f6f6f6; padding: 1rem; }}
  .ok {{ color: #1a7f37; }}
  .warn {{ color: #b35900; }}
  .button {{ padding: .5rem 1rem; }}
</style>
</head>
<body>
<h1>Conversion Result</h1>
{status}
<h2>Converted Text</h2>
<pre>{text}</pre>
<h2>Total Tokens Used</h2>
<p>{tokens} ({duration_ms} ms)</p>
<p><a class="button" href="/download/document">Download DOCX</a></p>
{audio}
<p><a href="/">Convert another document</a></p>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_config() -> ConversionConfig {
        let root = tempfile::tempdir().unwrap();
        // Leak the tempdir so the workspace outlives the config in tests.
        let path = root.keep();
        ConversionConfig::builder().workspace_root(path).build().unwrap()
    }

    #[tokio::test]
    async fn index_serves_the_form() {
        let app = router(test_config());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("multipart/form-data"));
        assert!(html.contains("name=\"document\""));
    }

    #[tokio::test]
    async fn download_before_convert_is_404() {
        let app = router(test_config());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download/document")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn convert_without_file_is_400() {
        let app = router(test_config());
        let boundary = "test-boundary";
        let body = format!("--{boundary}--\r\n");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/convert")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn escape_html_neutralises_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
    }
}
