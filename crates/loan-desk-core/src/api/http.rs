//! Blocking HTTP client for the loan API (ureq).

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::api::{check_path_id, LoanApi};
use crate::emi::LoanApplication;
use crate::error::LoanDeskError;
use crate::records::{
    decode_created_loan, decode_customer, decode_customers, decode_dues, decode_loan_detail,
    decode_loans, decode_payment, Customer, Due, Loan, NewCustomer, PaymentRecord, PaymentRequest,
};
use crate::types::{CustomerId, LoanId, TransactionId};
use crate::LoanDeskResult;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Root of the API, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    /// Whole-request timeout, connect included.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct HttpLoanApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpLoanApi {
    pub fn new(config: &ApiConfig) -> LoanDeskResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(LoanDeskError::InvalidInput {
                field: "api_url".into(),
                reason: format!("'{}' is not an http(s) URL", config.base_url),
            });
        }
        if config.timeout.is_zero() {
            return Err(LoanDeskError::InvalidInput {
                field: "timeout".into(),
                reason: "Timeout must be > 0".into(),
            });
        }

        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self { agent, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Run a read request. 404 maps to `NotFound`, other failures to
    /// `RequestFailure`, undecodable bodies to `SchemaError`.
    fn read(
        &self,
        operation: &str,
        resource: &str,
        id: &str,
        request: ureq::Request,
    ) -> LoanDeskResult<Value> {
        tracing::debug!(operation, url = request.url(), "GET");
        let response = match request.call() {
            Ok(r) => r,
            Err(ureq::Error::Status(404, _)) => {
                return Err(LoanDeskError::NotFound {
                    resource: resource.into(),
                    id: id.into(),
                })
            }
            Err(e) => {
                return Err(LoanDeskError::RequestFailure {
                    operation: operation.into(),
                    reason: describe(e),
                })
            }
        };
        let body = response.into_string().map_err(|e| LoanDeskError::RequestFailure {
            operation: operation.into(),
            reason: format!("reading body: {e}"),
        })?;
        serde_json::from_str(&body).map_err(|e| LoanDeskError::SchemaError {
            resource: resource.into(),
            reason: format!("invalid JSON: {e}"),
        })
    }

    /// POST a JSON body. Any 2xx status is success; every failure, transport
    /// included, is a `SubmissionFailure`.
    fn send(
        &self,
        operation: &str,
        path: &str,
        body: &impl Serialize,
    ) -> LoanDeskResult<ureq::Response> {
        let url = self.url(path);
        let payload = serde_json::to_string(body)?;
        tracing::debug!(operation, url = %url, "POST");

        self.agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&payload)
            .map_err(|e| submission_failure(operation, describe(e)))
    }

    /// [`send`](Self::send), then decode the JSON the API answers with.
    /// An empty body decodes to `Null`.
    fn submit(
        &self,
        operation: &str,
        resource: &str,
        path: &str,
        body: &impl Serialize,
    ) -> LoanDeskResult<Value> {
        let text = self
            .send(operation, path, body)?
            .into_string()
            .map_err(|e| submission_failure(operation, format!("reading body: {e}")))?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| LoanDeskError::SchemaError {
            resource: resource.into(),
            reason: format!("invalid JSON: {e}"),
        })
    }
}

fn submission_failure(operation: &str, reason: String) -> LoanDeskError {
    tracing::warn!(operation, %reason, "submission rejected");
    LoanDeskError::SubmissionFailure {
        operation: operation.into(),
        reason,
    }
}

fn describe(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            if body.trim().is_empty() {
                format!("HTTP {code}")
            } else {
                format!("HTTP {code}: {}", body.trim())
            }
        }
        ureq::Error::Transport(t) => t.to_string(),
    }
}

impl LoanApi for HttpLoanApi {
    fn list_customers(&self, search: Option<&str>) -> LoanDeskResult<Vec<Customer>> {
        let mut request = self.agent.get(&self.url("customers"));
        if let Some(q) = search.map(str::trim).filter(|q| !q.is_empty()) {
            request = request.query("search", q);
        }
        decode_customers(self.read("list customers", "customer", "*", request)?)
    }

    fn get_customer(&self, id: &CustomerId) -> LoanDeskResult<Customer> {
        check_path_id("customer", id.as_str())?;
        let request = self.agent.get(&self.url(&format!("customers/{id}")));
        decode_customer(self.read("get customer", "customer", id.as_str(), request)?)
    }

    fn create_customer(&self, customer: &NewCustomer) -> LoanDeskResult<Customer> {
        let created = self.submit("create customer", "customer", "customers", customer)?;
        tracing::info!(name = %customer.name, "customer created");
        decode_customer(created)
    }

    fn list_customer_loans(&self, customer: &CustomerId) -> LoanDeskResult<Vec<Loan>> {
        check_path_id("customer", customer.as_str())?;
        let request = self.agent.get(&self.url(&format!("loans/customer/{customer}")));
        decode_loans(self.read("list loans", "customer", customer.as_str(), request)?)
    }

    fn get_loan(&self, id: &LoanId) -> LoanDeskResult<Loan> {
        check_path_id("loan", id.as_str())?;
        let request = self.agent.get(&self.url(&format!("loans/{id}")));
        decode_loan_detail(self.read("get loan", "loan", id.as_str(), request)?)
    }

    fn create_loan(&self, application: &LoanApplication) -> LoanDeskResult<LoanId> {
        let created = self.submit("create loan", "loan", "loans", application)?;
        let id = decode_created_loan(&created)?;
        tracing::info!(loan = %id, customer = %application.customer, "loan approved");
        Ok(id)
    }

    fn list_loan_dues(&self, loan: &LoanId) -> LoanDeskResult<Vec<Due>> {
        check_path_id("loan", loan.as_str())?;
        let request = self.agent.get(&self.url(&format!("dues/loan/{loan}")));
        decode_dues(self.read("list dues", "loan", loan.as_str(), request)?)
    }

    /// The response body carries nothing the desk needs and is not read.
    fn create_payment(&self, payment: &PaymentRequest) -> LoanDeskResult<()> {
        self.send("record payment", "payments", payment)?;
        tracing::info!(
            transaction = %payment.transaction_id,
            loan = %payment.loan_id,
            amount = %payment.amount,
            "payment recorded"
        );
        Ok(())
    }

    fn get_payment(&self, id: &TransactionId) -> LoanDeskResult<PaymentRecord> {
        check_path_id("transaction", id.as_str())?;
        let request = self.agent.get(&self.url(&format!("payments/transaction/{id}")));
        decode_payment(self.read("get payment", "payment", id.as_str(), request)?)
    }
}
