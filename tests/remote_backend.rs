use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pose_guardian::infer::{wire, RemoteBackend, RemoteConfig, SyntheticBackend, SyntheticConfig};
use pose_guardian::{
    ArchetypeLibrary, ErrorKind, InferenceBackend, PoseClass, PoseSession, SessionState, Upload,
};

struct CapturedRequest {
    head: String,
    body: Vec<u8>,
}

/// Serves one HTTP response on a loopback port and hands back what it received.
fn serve_once(status: &str, body: String) -> (String, mpsc::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    let status = status.to_string();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).expect("read header") == 0 || line == "\r\n" {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            head.push_str(&line);
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).expect("read body");

        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        let _ = tx.send(CapturedRequest {
            head,
            body: request_body,
        });
    });

    (format!("http://{addr}"), rx)
}

fn library() -> Arc<ArchetypeLibrary> {
    Arc::new(ArchetypeLibrary::builtin().expect("builtin archetypes"))
}

fn remote(base_url: String, model_path: Option<&str>) -> RemoteBackend {
    let demo = SyntheticBackend::new(
        SyntheticConfig {
            latency: Duration::ZERO,
            seed: Some(3),
            ..SyntheticConfig::default()
        },
        library(),
    )
    .expect("demo backend");
    let config = RemoteConfig {
        base_url,
        timeout: Duration::from_secs(5),
        model_path: model_path.map(str::to_string),
    };
    RemoteBackend::new(config, demo).expect("remote backend")
}

fn upload() -> Upload {
    Upload::new("capture.csv", b"subcarrier_0,subcarrier_1\n0.25,0.5\n".to_vec())
}

fn kneeling_points() -> Vec<(f32, f32)> {
    library()
        .archetype(PoseClass::Kneel)
        .iter()
        .map(|p| (p.x, p.y))
        .collect()
}

fn kneeling_body() -> String {
    kneeling_body_with(&kneeling_points())
}

fn kneeling_body_with(points: &[(f32, f32)]) -> String {
    let keypoints: Vec<String> = points
        .iter()
        .map(|(x, y)| format!(r#"{{"x": {x}, "y": {y}}}"#))
        .collect();
    format!(
        r#"{{"human_present": true, "pose_class": "Kneel", "keypoints": [{}],
            "confidence": {{"Stand": 0.05, "Sit": 0.1, "Kneel": 0.85, "Sleep": 0.02}}}}"#,
        keypoints.join(",")
    )
}

#[tokio::test]
async fn posts_multipart_and_decodes_result() {
    let (url, captured) = serve_once("200 OK", kneeling_body());
    let backend = remote(url, Some("models/pose.onnx"));

    let result = backend.predict(&upload()).await.expect("prediction");
    assert!(result.human_present());
    assert_eq!(result.pose_class(), PoseClass::Kneel);
    assert_eq!(result.keypoints(), &library().archetype(PoseClass::Kneel));
    assert_eq!(
        result.confidence().map(|c| c.get(PoseClass::Kneel)),
        Some(0.85)
    );

    let request = captured
        .recv_timeout(Duration::from_secs(5))
        .expect("captured request");
    let head = request.head.to_ascii_lowercase();
    assert!(head.starts_with("post /infer http/1.1"));
    assert!(head.contains("content-type: multipart/form-data; boundary=----pose-guardian-"));
    assert!(head.contains("model-path: models/pose.onnx"));

    let body = String::from_utf8(request.body).expect("utf-8 body");
    assert!(body.contains(r#"name="file"; filename="capture.csv""#));
    assert!(body.contains("subcarrier_0,subcarrier_1\n0.25,0.5\n"));
}

#[tokio::test]
async fn server_error_is_transport_failure() {
    let (url, _captured) = serve_once(
        "500 Internal Server Error",
        r#"{"error": "Failed to load model"}"#.to_string(),
    );
    let backend = remote(url, None);

    let err = backend.predict(&upload()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("Failed to load model"));
}

#[tokio::test]
async fn incomplete_body_is_malformed() {
    let (url, _captured) = serve_once(
        "200 OK",
        r#"{"human_present": true, "pose_class": "Stand", "keypoints": [{"x": 0.5, "y": 0.5}]}"#
            .to_string(),
    );
    let backend = remote(url, None);

    let err = backend.predict(&upload()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResult);
}

#[tokio::test]
async fn off_canvas_keypoints_are_malformed() {
    let mut points = kneeling_points();
    points[0].0 = 1.0e7;
    let (url, _captured) = serve_once("200 OK", kneeling_body_with(&points));
    let backend = remote(url, None);
    let session = PoseSession::new(std::rc::Rc::new(backend));

    let err = session.submit(&upload()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResult);
    assert!(err.is_transport());
    assert_eq!(session.state(), SessionState::Failure);
    assert!(session.frame().keypoints.is_none());
}

#[tokio::test]
async fn unreachable_backend_is_transport_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let backend = remote(format!("http://127.0.0.1:{port}"), None);

    let session = PoseSession::new(std::rc::Rc::new(backend));
    let err = session.submit(&upload()).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(session.state(), SessionState::Failure);
}

#[tokio::test]
async fn sample_requests_stay_offline() {
    let backend = remote("http://127.0.0.1:9".to_string(), None);

    let result = backend.sample().await.expect("sample");
    assert!(result.human_present());
    assert!(result
        .confidence()
        .expect("confidence")
        .strictly_favors(result.pose_class()));
}

#[test]
fn encoded_results_decode_to_the_same_prediction() {
    let body = kneeling_body();
    let decoded = wire::decode(&body).expect("decode");
    let again = wire::decode(&wire::encode(&decoded).expect("encode")).expect("re-decode");
    assert_eq!(again.pose_class(), decoded.pose_class());
    assert_eq!(again.human_present(), decoded.human_present());
    for (a, b) in again.keypoints().iter().zip(decoded.keypoints().iter()) {
        assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
    }
}
