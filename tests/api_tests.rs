// tests/api_tests.rs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use training_notifier::{
    audit::MemoryAuditLog,
    config::Config,
    mail::{EmailMessage, MailError, Mailer},
    report::ReportRenderer,
    routes,
    state::AppState,
};

/// Records every email instead of delivering it.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailError> {
        // Build the MIME message as a real transport would.
        email.to_message()?;
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &EmailMessage) -> Result<(), MailError> {
        Err(MailError::Send("relay refused connection".to_string()))
    }
}

struct HangingMailer;

#[async_trait]
impl Mailer for HangingMailer {
    async fn send(&self, _email: &EmailMessage) -> Result<(), MailError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

struct TestApp {
    address: String,
    audit_log: Arc<MemoryAuditLog>,
}

/// Spawns the app on a random port with the given mailer and an in-memory log.
async fn spawn_app(mailer: Arc<dyn Mailer>) -> TestApp {
    let audit_log = Arc::new(MemoryAuditLog::new());

    let config = Config {
        rust_log: "error".to_string(),
        mail_timeout: Duration::from_millis(500),
        ..Config::default()
    };

    let state = AppState {
        config,
        mailer,
        audit_log: audit_log.clone(),
        renderer: Arc::new(ReportRenderer::new().unwrap()),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, audit_log }
}

fn valid_submission() -> serde_json::Value {
    serde_json::json!({
        "firstName": "Jan",
        "lastName": "Kowalski",
        "trainingDate": "2024-01-15",
        "score": 10,
        "total": 12,
        "duration": 95
    })
}

#[tokio::test]
async fn submit_sends_email_and_logs_once() {
    // Arrange
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone()).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/sendmail.php", app.address))
        .json(&valid_submission())
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Email wysłany pomyślnie");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.to, "kontakt@inovit.com.pl");
    assert_eq!(email.subject, "Szkolenie dla nowego pracownika - Jan Kowalski");
    assert!(email.text_body.contains("- Czas trwania: 01:35 min"));
    assert!(email.text_body.contains("- Procent poprawnych: 83%"));
    assert!(email.text_body.contains("- Data rozpoczęcia: 15.01.2024"));
    assert!(email.text_body.contains("BRAK - wszystkie odpowiedzi poprawne!"));
    assert!(email.html_body.contains("BRAK - wszystkie odpowiedzi poprawne!"));

    let lines = app.audit_log.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("| SUCCESS | Jan Kowalski |"));
    assert!(lines[0].contains("10/12 (83%)"));
    assert!(lines[0].ends_with("| Czas: 01:35\n"));
}

#[tokio::test]
async fn submit_renders_wrong_answers_escaped() {
    // Arrange
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone()).await;
    let client = reqwest::Client::new();
    let mut body = valid_submission();
    body["firstName"] = serde_json::json!("  <Jan> ");
    body["wrong"] = serde_json::json!([
        {"nr": 3, "user": "B", "correct": "A"},
        {"nr": 7, "user": "<script>", "correct": "\"C\""}
    ]);

    // Act
    let response = client
        .post(&format!("{}/api/notify", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let email = &mailer.sent()[0];
    assert!(email.subject.ends_with("&lt;Jan&gt; Kowalski"));
    assert!(email.html_body.contains(
        "<strong>Pytanie 3:</strong> użytkownik wybrał '<strong>B</strong>', poprawna odpowiedź to '<strong>A</strong>'"
    ));
    assert!(email.text_body.contains("  - Pytanie 3: użytkownik wybrał 'B', poprawna odpowiedź to 'A'"));
    assert!(email.html_body.contains("&lt;script&gt;"));
    assert!(email.html_body.contains("&quot;C&quot;"));
    assert!(!email.html_body.contains("<script>"));
}

#[tokio::test]
async fn malformed_wrong_list_still_sends() {
    // Arrange
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone()).await;
    let client = reqwest::Client::new();
    let mut scalar_items = valid_submission();
    scalar_items["wrong"] = serde_json::json!([5]);
    let mut empty_object = valid_submission();
    empty_object["wrong"] = serde_json::json!({});

    // Act
    for body in [&scalar_items, &empty_object] {
        let response = client
            .post(&format!("{}/sendmail.php", app.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
    }

    // Assert
    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].text_body.contains(
        "  - Pytanie ?: użytkownik wybrał 'brak', poprawna odpowiedź to '?'"
    ));
    assert!(!sent[0].text_body.contains("BRAK - wszystkie odpowiedzi poprawne!"));
    assert!(sent[1].text_body.contains("BRAK - wszystkie odpowiedzi poprawne!"));
    assert!(sent[1].html_body.contains("BRAK - wszystkie odpowiedzi poprawne!"));
    assert_eq!(app.audit_log.lines().len(), 2);
}

#[tokio::test]
async fn options_returns_ok_without_processing() {
    // Arrange
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone()).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .request(reqwest::Method::OPTIONS, &format!("{}/sendmail.php", app.address))
        .header("Origin", "https://szkolenie.example.com")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(response.text().await.unwrap().is_empty());
    assert!(mailer.sent().is_empty());
    assert!(app.audit_log.lines().is_empty());
}

#[tokio::test]
async fn get_is_method_not_allowed() {
    // Arrange
    let app = spawn_app(Arc::new(RecordingMailer::default())).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/sendmail.php", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 405);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Metoda niedozwolona. Użyj POST.");
}

#[tokio::test]
async fn missing_training_date_is_bad_request() {
    // Arrange
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone()).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/sendmail.php", app.address))
        .json(&serde_json::json!({"firstName": "Jan", "lastName": "Kowalski"}))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Brak wymaganych danych (firstName, lastName, trainingDate)"
    );
    assert!(mailer.sent().is_empty());
    assert!(app.audit_log.lines().is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    // Arrange
    let app = spawn_app(Arc::new(RecordingMailer::default())).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/sendmail.php", app.address))
        .header("Content-Type", "application/json")
        .body("{\"firstName\": \"Jan\",")
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn unparseable_date_is_json_server_error() {
    // Arrange
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone()).await;
    let client = reqwest::Client::new();
    let mut body = valid_submission();
    body["trainingEndTime"] = serde_json::json!("koniec szkolenia");

    // Act
    let response = client
        .post(&format!("{}/sendmail.php", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("koniec szkolenia"));
    assert!(mailer.sent().is_empty());
    assert!(app.audit_log.lines().is_empty());
}

#[tokio::test]
async fn dispatch_failure_is_not_logged() {
    // Arrange
    let app = spawn_app(Arc::new(FailingMailer)).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/sendmail.php", app.address))
        .json(&valid_submission())
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Błąd wysyłania emaila");
    assert!(app.audit_log.lines().is_empty());
}

#[tokio::test]
async fn dispatch_timeout_is_a_failure() {
    // Arrange
    let app = spawn_app(Arc::new(HangingMailer)).await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/sendmail.php", app.address))
        .json(&valid_submission())
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Błąd wysyłania emaila");
    assert!(app.audit_log.lines().is_empty());
}

#[tokio::test]
async fn resubmission_is_not_deduplicated() {
    // Arrange
    let mailer = Arc::new(RecordingMailer::default());
    let app = spawn_app(mailer.clone()).await;
    let client = reqwest::Client::new();

    // Act
    for _ in 0..2 {
        let response = client
            .post(&format!("{}/sendmail.php", app.address))
            .json(&valid_submission())
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
    }

    // Assert
    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_ne!(sent[0].boundary, sent[1].boundary);
    assert_eq!(app.audit_log.lines().len(), 2);
}
