#![cfg(feature = "api")]

use loan_desk_core::api::{ApiConfig, HttpLoanApi, LoanApi};
use loan_desk_core::emi::{EmiInput, LoanApplication};
use loan_desk_core::records::{DueStatus, PaymentKind, PaymentMethod, PaymentRequest};
use loan_desk_core::{CustomerId, DueId, LoanDeskError, LoanId, TransactionId};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

// ===========================================================================
// One-shot loopback server
// ===========================================================================

struct Captured {
    request_line: String,
    body: String,
}

/// Accept a single connection, answer it with `status` and `body`, and hand
/// back what the client sent.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0usize;
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut raw_body = vec![0u8; content_length];
        reader.read_exact(&mut raw_body).unwrap();

        let response = [
            format!("HTTP/1.1 {status}"),
            "Content-Type: application/json".to_string(),
            format!("Content-Length: {}", body.len()),
            "Connection: close".to_string(),
            String::new(),
            body.to_string(),
        ]
        .join("\r\n");
        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8(raw_body).unwrap(),
        }
    });

    (base_url, handle)
}

fn client(base_url: String) -> HttpLoanApi {
    HttpLoanApi::new(&ApiConfig {
        base_url,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

// ===========================================================================
// Reads
// ===========================================================================

#[test]
fn test_get_loan_decodes_embedded_dues() {
    let (url, server) = serve_once(
        "200 OK",
        concat!(
            r#"{"_id":"l1","customer":{"_id":"c1","name":"Asha"},"#,
            r#""principal":100000,"interest":12,"duration":2,"dues":["#,
            r#"{"_id":"d1","dueDate":"2025-01-05T00:00:00.000Z","dueAmount":50374.38,"#,
            r#""status":"paid","paidDate":"2025-01-07"},"#,
            r#"{"_id":"d2","dueDate":"2025-02-05","dueAmount":"50374.38","status":"unpaid"}]}"#,
        ),
    );

    let loan = client(url).get_loan(&LoanId::new("l1")).unwrap();
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "GET /api/loans/l1 HTTP/1.1");
    assert_eq!(loan.customer, CustomerId::new("c1"));
    assert_eq!(loan.dues.len(), 2);
    assert_eq!(loan.dues[0].status, DueStatus::Paid);
    assert_eq!(loan.dues[1].amount, dec!(50374.38));
    assert_eq!(loan.outstanding(), dec!(50374.38));
}

#[test]
fn test_missing_loan_is_not_found() {
    let (url, server) = serve_once("404 Not Found", r#"{"message":"Loan not found"}"#);
    let err = client(url).get_loan(&LoanId::new("nope")).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, LoanDeskError::NotFound { ref resource, .. } if resource == "loan"));
}

#[test]
fn test_malformed_dues_are_schema_errors() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"_id":"d1","dueDate":"2025-02-05","status":"unpaid"}]"#,
    );
    let err = client(url).list_loan_dues(&LoanId::new("l1")).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, LoanDeskError::SchemaError { .. }));
}

#[test]
fn test_customer_search_is_sent_as_query() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"_id":"c1","name":"Asha Verma","phone":9876543210}]"#,
    );
    let found = client(url).list_customers(Some("asha")).unwrap();
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "GET /api/customers?search=asha HTTP/1.1");
    assert_eq!(found[0].phone, "9876543210");
}

#[test]
fn test_path_ids_are_checked_before_sending() {
    let api = client("http://127.0.0.1:1/api".into());
    assert!(matches!(
        api.get_payment(&TransactionId::new("../admin")),
        Err(LoanDeskError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Writes
// ===========================================================================

#[test]
fn test_create_loan_posts_terms_and_reads_id() {
    let (url, server) = serve_once("201 Created", r#"{"message":"Loan created","loanId":"l9"}"#);
    let application = LoanApplication::new(
        CustomerId::new("c1"),
        &EmiInput {
            principal: dec!(100000),
            annual_rate_percent: dec!(12),
            months: 12,
        },
    )
    .unwrap();

    let id = client(url).create_loan(&application).unwrap();
    let captured = server.join().unwrap();

    assert_eq!(id, LoanId::new("l9"));
    assert_eq!(captured.request_line, "POST /api/loans HTTP/1.1");
    let sent: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(
        sent,
        json!({"customer": "c1", "principal": 100000.0, "interest": 12.0, "duration": 12})
    );
}

#[test]
fn test_create_payment_posts_camel_case_body() {
    let (url, server) = serve_once("201 Created", r#"{"message":"Payment recorded"}"#);
    let request = PaymentRequest {
        loan_id: LoanId::new("l1"),
        transaction_id: TransactionId::new("TXNABC"),
        method: PaymentMethod::Upi,
        amount: dec!(1750),
        kind: PaymentKind::Settlement,
        count: 2,
        dues: vec![DueId::new("d2"), DueId::new("d3")],
        discount: dec!(250),
    };

    client(url).create_payment(&request).unwrap();
    let captured = server.join().unwrap();

    let sent: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["loanId"], "l1");
    assert_eq!(sent["transactionId"], "TXNABC");
    assert_eq!(sent["method"], "UPI");
    assert_eq!(sent["type"], "settlement");
    assert_eq!(sent["count"], 2);
    assert_eq!(sent["dues"], json!(["d2", "d3"]));
    assert_eq!(sent["amount"].as_f64(), Some(1750.0));
    assert_eq!(sent["discount"].as_f64(), Some(250.0));
}

#[test]
fn test_rejected_payment_is_submission_failure() {
    let (url, server) = serve_once("400 Bad Request", r#"{"message":"Due already paid"}"#);
    let request = PaymentRequest {
        loan_id: LoanId::new("l1"),
        transaction_id: TransactionId::new("TXNDEF"),
        method: PaymentMethod::Cash,
        amount: dec!(100),
        kind: PaymentKind::Single,
        count: 1,
        dues: vec![DueId::new("d1")],
        discount: dec!(0),
    };

    let err = client(url).create_payment(&request).unwrap_err();
    server.join().unwrap();
    match err {
        LoanDeskError::SubmissionFailure { reason, .. } => {
            assert!(reason.contains("400"));
            assert!(reason.contains("Due already paid"));
        }
        other => panic!("expected SubmissionFailure, got {other:?}"),
    }
}

#[test]
fn test_payment_accepted_with_plain_text_body() {
    let (url, server) = serve_once("201 Created", "Payment recorded");
    let request = PaymentRequest {
        loan_id: LoanId::new("l1"),
        transaction_id: TransactionId::new("TXNGHI"),
        method: PaymentMethod::Card,
        amount: dec!(50374.38),
        kind: PaymentKind::Single,
        count: 1,
        dues: vec![DueId::new("d2")],
        discount: dec!(0),
    };

    let result = client(url).create_payment(&request);
    let captured = server.join().unwrap();

    assert!(result.is_ok(), "expected success, got {result:?}");
    assert_eq!(captured.request_line, "POST /api/payments HTTP/1.1");
    let sent: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["transactionId"], "TXNGHI");
}
