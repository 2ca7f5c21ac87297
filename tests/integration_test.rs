use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{GrayImage, Luma, RgbImage};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::io::Cursor;
use std::net::TcpStream;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

// Use atomic counter to give each test a unique port
static PORT_COUNTER: AtomicU16 = AtomicU16::new(9500);

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct CleanupStats {
    total_time_ms: u64,
    threshold: u8,
    min_area: u32,
    components_before: usize,
    components_after: usize,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ProcessResponse {
    image: String,
    svg: Option<String>,
    detector: String,
    width: u32,
    height: u32,
    processing_time_ms: u64,
    cleanup: CleanupStats,
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct DetectorInfo {
    name: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct InfoResponse {
    version: String,
    default_detector: String,
    available_detectors: Vec<DetectorInfo>,
    vectorizer: String,
    max_file_size_bytes: usize,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ErrorResponse {
    error: String,
    code: String,
}

struct TestServer {
    child: Child,
    port: u16,
}

impl TestServer {
    fn start() -> Self {
        Self::start_with(&[])
    }

    fn start_with(extra_args: &[&str]) -> Self {
        let port = PORT_COUNTER.fetch_add(1, Ordering::SeqCst);

        let child = Command::new(env!("CARGO_BIN_EXE_lineart-cleanup-server"))
            .args(["--host", "127.0.0.1", "--port", &port.to_string()])
            .args(extra_args)
            .spawn()
            .expect("Failed to start server");

        // Wait for server to accept connections
        for _ in 0..50 {
            if TcpStream::connect(("127.0.0.1", port)).is_ok() {
                break;
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        Self { child, port }
    }

    fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

/// 40x40 detector mask: a long diagonal stroke, a 6x6 blob and three specks
fn sample_mask() -> GrayImage {
    GrayImage::from_fn(40, 40, |x, y| {
        let stroke = x == y && (5..35).contains(&x);
        let blob = (25..31).contains(&x) && (4..10).contains(&y);
        let speck = [(3, 30), (35, 12), (12, 36)].contains(&(x, y));
        Luma([if stroke || blob || speck { 240 } else { 10 }])
    })
}

fn png_bytes(image: &GrayImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes.into_inner()
}

fn decode_data_url(url: &str) -> RgbImage {
    let payload = url.split_once(',').expect("Not a data URL").1;
    let bytes = STANDARD.decode(payload).expect("Invalid base64");
    image::load_from_memory(&bytes)
        .expect("Failed to decode image")
        .to_rgb8()
}

async fn post_mask(
    client: &reqwest::Client,
    url: &str,
    mask: &GrayImage,
    fields: &[(&str, &str)],
) -> reqwest::Response {
    let part = Part::bytes(png_bytes(mask))
        .file_name("mask.png")
        .mime_str("image/png")
        .unwrap();

    let mut form = Form::new().part("file", part);
    for (name, value) in fields {
        form = form.text(name.to_string(), value.to_string());
    }

    client
        .post(url)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::start();
    let client = reqwest::Client::new();

    let response: HealthResponse = client
        .get(&format!("{}/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(response.status, "ok");
}

#[tokio::test]
async fn test_info_endpoint() {
    let server = TestServer::start();
    let client = reqwest::Client::new();

    let response: InfoResponse = client
        .get(&format!("{}/info", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(!response.version.is_empty());
    assert_eq!(response.default_detector, "mask");

    let names: Vec<&str> = response
        .available_detectors
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert!(names.contains(&"mask"));
    assert!(names.contains(&"sobel"));
}

#[tokio::test]
async fn test_process_removes_specks_and_inverts() {
    let server = TestServer::start();
    let client = reqwest::Client::new();

    let response = post_mask(
        &client,
        &format!("{}/process", server.base_url()),
        &sample_mask(),
        &[],
    )
    .await;
    assert!(response.status().is_success());

    let result: ProcessResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(result.detector, "mask");
    assert_eq!((result.width, result.height), (40, 40));
    assert_eq!(result.cleanup.components_before, 5);
    assert_eq!(result.cleanup.components_after, 2);

    let image = decode_data_url(&result.image);
    assert_eq!(image.dimensions(), (40, 40));
    // Stroke and blob are ink
    assert_eq!(image.get_pixel(20, 20).0, [0, 0, 0]);
    assert_eq!(image.get_pixel(27, 6).0, [0, 0, 0]);
    // Specks are gone
    assert_eq!(image.get_pixel(3, 30).0, [255, 255, 255]);
    assert_eq!(image.get_pixel(35, 12).0, [255, 255, 255]);
    // Only two values, all channels equal
    for pixel in image.pixels() {
        let [r, g, b] = pixel.0;
        assert!(r == g && g == b);
        assert!(r == 0 || r == 255);
    }
}

#[tokio::test]
async fn test_server_threshold_flag() {
    // Mask samples are 240, so a threshold of 250 leaves nothing
    let server = TestServer::start_with(&["--threshold", "250"]);
    let client = reqwest::Client::new();

    let response = post_mask(
        &client,
        &format!("{}/process", server.base_url()),
        &sample_mask(),
        &[("output_format", "png")],
    )
    .await;
    let result: ProcessResponse = response.json().await.expect("Failed to parse response");

    assert!(result.image.starts_with("data:image/png;base64,"));
    let image = decode_data_url(&result.image);
    assert!(image.pixels().all(|p| p.0 == [255, 255, 255]));
}

#[tokio::test]
async fn test_svg_request_always_returns_raster() {
    let server = TestServer::start();
    let client = reqwest::Client::new();

    let response = post_mask(
        &client,
        &format!("{}/process", server.base_url()),
        &sample_mask(),
        &[("output_format", "svg"), ("model_type", "anime")],
    )
    .await;
    assert!(response.status().is_success());

    let result: ProcessResponse = response.json().await.expect("Failed to parse response");
    assert!(result.image.starts_with("data:image/webp;base64,"));
    match result.svg {
        Some(svg) => assert!(svg.contains("<svg")),
        None => assert!(!result.warnings.is_empty()),
    }
}

#[tokio::test]
async fn test_process_with_explicit_sobel_detector() {
    let server = TestServer::start();
    let client = reqwest::Client::new();

    let response = post_mask(
        &client,
        &format!("{}/process/sobel", server.base_url()),
        &sample_mask(),
        &[("model_type", "fine"), ("min_area", "1")],
    )
    .await;
    assert!(
        response.status().is_success(),
        "Expected success status, got {}",
        response.status()
    );

    let result: ProcessResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(result.detector, "sobel");
    assert_eq!(result.cleanup.min_area, 1);
}

#[tokio::test]
async fn test_missing_file_is_rejected() {
    let server = TestServer::start();
    let client = reqwest::Client::new();

    let form = Form::new().text("model_type", "anime");
    let response = client
        .post(&format!("{}/process", server.base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let error: ErrorResponse = response.json().await.expect("Failed to parse error");
    assert_eq!(error.code, "MISSING_FILE");
}
