//! Bookkeeping assistant
//!
//! Prompts a hosted model with the chart of accounts and turns its answers
//! into suggested journal entries. Suggestions are never posted directly;
//! [`apply_suggestion`] sends them through the journal service.

pub mod backend;
pub mod suggestion;

pub use backend::{GeminiClient, GenerateRequest, ImageData, ModelBackend};
pub use suggestion::SuggestedEntry;

use chrono::NaiveDate;

use crate::error::{LibroError, LibroResult};
use crate::models::account::chart_context;
use crate::models::JournalEntry;
use crate::services::JournalService;
use crate::storage::Storage;

const SYSTEM_PROMPT: &str = "You are a bookkeeping assistant for a small business using \
double-entry accounting. Only use account ids from the chart of accounts below. \
Every entry must balance: total debits equal total credits.";

const CHAT_FAILED: &str = "The assistant could not answer right now. Try again later.";
const PREDICT_FAILED: &str = "Could not turn that description into an entry.";
const LEDGER_FAILED: &str = "Could not read entries from that image.";
const RECEIPT_FAILED: &str = "Could not read that receipt.";

pub struct AssistantService<B: ModelBackend> {
    backend: B,
}

impl<B: ModelBackend> AssistantService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn system() -> String {
        format!("{}\n\n{}", SYSTEM_PROMPT, chart_context())
    }

    /// Run a request; any failure becomes a user-facing message and the
    /// underlying cause goes to the log
    fn call<T>(
        &self,
        request: GenerateRequest,
        user_message: &'static str,
        parse: impl FnOnce(&str) -> LibroResult<T>,
    ) -> LibroResult<T> {
        let result = self
            .backend
            .generate(&request)
            .and_then(|text| parse(&text));
        result.map_err(|e| {
            tracing::warn!(error = %e, "assistant request failed");
            LibroError::Assistant(user_message.to_string())
        })
    }

    /// Free-form question about the books
    pub fn chat(&self, message: &str) -> LibroResult<String> {
        if message.trim().is_empty() {
            return Err(LibroError::Validation("Message cannot be empty".into()));
        }
        let request = GenerateRequest {
            system: Self::system(),
            prompt: message.trim().to_string(),
            ..Default::default()
        };
        self.call(request, CHAT_FAILED, |text| Ok(text.trim().to_string()))
    }

    /// Suggest a journal entry for a plain-language description
    pub fn predict_entry(&self, text: &str, today: NaiveDate) -> LibroResult<SuggestedEntry> {
        if text.trim().is_empty() {
            return Err(LibroError::Validation("Description cannot be empty".into()));
        }
        let request = GenerateRequest {
            system: Self::system(),
            prompt: format!(
                "Today is {}. Propose one journal entry for this operation. \
                 Use dates as YYYY-MM-DD.\n\nOperation: {}",
                today,
                text.trim()
            ),
            image: None,
            response_schema: Some(suggestion::entry_schema(false)),
        };
        self.call(request, PREDICT_FAILED, suggestion::parse_entry)
    }

    /// Read a photographed ledger page into a list of entries
    pub fn scan_ledger(&self, image: ImageData) -> LibroResult<Vec<SuggestedEntry>> {
        let request = GenerateRequest {
            system: Self::system(),
            prompt: "Transcribe every operation in this ledger image as a journal entry. \
                     Use dates as YYYY-MM-DD."
                .to_string(),
            image: Some(image),
            response_schema: Some(suggestion::ledger_schema()),
        };
        self.call(request, LEDGER_FAILED, suggestion::parse_ledger)
    }

    /// Read a receipt or invoice into one entry with its vendor
    pub fn scan_receipt(&self, image: ImageData) -> LibroResult<SuggestedEntry> {
        let request = GenerateRequest {
            system: Self::system(),
            prompt: "Read this receipt. Propose the journal entry that records it and \
                     name the vendor. Use dates as YYYY-MM-DD."
                .to_string(),
            image: Some(image),
            response_schema: Some(suggestion::entry_schema(true)),
        };
        self.call(request, RECEIPT_FAILED, suggestion::parse_entry)
    }
}

/// Post a suggestion to the journal; `fallback_date` is used when the
/// model gave none
pub fn apply_suggestion(
    storage: &Storage,
    suggestion: &SuggestedEntry,
    fallback_date: NaiveDate,
) -> LibroResult<JournalEntry> {
    let description = match (&suggestion.vendor, suggestion.description.is_empty()) {
        (Some(vendor), true) => vendor.clone(),
        (Some(vendor), false) if !suggestion.description.contains(vendor.as_str()) => {
            format!("{} ({})", suggestion.description, vendor)
        }
        _ => suggestion.description.clone(),
    };
    JournalService::new(storage).add_postings(
        suggestion.date.unwrap_or(fallback_date),
        &description,
        suggestion.debit_parts.clone(),
        suggestion.credit_parts.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::models::{Money, Posting};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Answers with a canned reply and remembers the last request
    struct StubBackend {
        reply: LibroResult<String>,
        seen: RefCell<Option<GenerateRequest>>,
    }

    impl StubBackend {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: RefCell::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(LibroError::Http("503 Service Unavailable".into())),
                seen: RefCell::new(None),
            }
        }
    }

    impl ModelBackend for &StubBackend {
        fn generate(&self, request: &GenerateRequest) -> LibroResult<String> {
            *self.seen.borrow_mut() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(LibroError::Http(e.to_string())),
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_chat_carries_chart() {
        let stub = StubBackend::replying("  Your bank balance is positive. ");
        let service = AssistantService::new(&stub);

        let answer = service.chat("How is my bank?").unwrap();
        assert_eq!(answer, "Your bank balance is positive.");

        let seen = stub.seen.borrow();
        let request = seen.as_ref().unwrap();
        assert!(request.system.contains("acc_bank"));
        assert!(request.response_schema.is_none());
        assert!(service.chat("   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_predict_entry() {
        let stub = StubBackend::replying(
            r#"{"description": "Electricity bill", "amount": 80,
                "debitParts": [{"accountId": "acc_utilities", "amount": 80}],
                "creditParts": [{"accountId": "acc_bank", "amount": 80}]}"#,
        );
        let service = AssistantService::new(&stub);

        let entry = service.predict_entry("paid 80 for electricity", today()).unwrap();
        assert_eq!(entry.amount, Money::from_units(80));
        assert!(entry.date.is_none());

        let seen = stub.seen.borrow();
        let request = seen.as_ref().unwrap();
        assert!(request.prompt.contains("2025-06-15"));
        assert!(request.response_schema.is_some());
    }

    #[test]
    fn test_failures_become_static_message() {
        let stub = StubBackend::failing();
        let service = AssistantService::new(&stub);
        match service.predict_entry("anything", today()) {
            Err(LibroError::Assistant(msg)) => assert_eq!(msg, PREDICT_FAILED),
            other => panic!("unexpected: {:?}", other),
        }

        let garbled = StubBackend::replying("sorry, I can't");
        let service = AssistantService::new(&garbled);
        let image = ImageData {
            mime_type: "image/png".into(),
            bytes: vec![0],
        };
        match service.scan_receipt(image) {
            Err(LibroError::Assistant(msg)) => assert_eq!(msg, RECEIPT_FAILED),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_scan_ledger_sends_image() {
        let stub = StubBackend::replying(
            r#"```json
            {"entries": [
              {"description": "Sale", "amount": 100, "date": "2025-06-01",
               "debitParts": [{"accountId": "acc_cash", "amount": 100}],
               "creditParts": [{"accountId": "acc_sales", "amount": 100}]},
              {"description": "Fuel", "amount": 30, "date": "2025-06-02",
               "debitParts": [{"accountId": "acc_other_expense", "amount": 30}],
               "creditParts": [{"accountId": "acc_cash", "amount": 30}]}
            ]}
            ```"#,
        );
        let service = AssistantService::new(&stub);
        let image = ImageData {
            mime_type: "image/jpeg".into(),
            bytes: vec![1, 2],
        };

        let entries = service.scan_ledger(image).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(stub.seen.borrow().as_ref().unwrap().image.is_some());
    }

    #[test]
    fn test_apply_goes_through_journal() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(LibroPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let good = SuggestedEntry {
            description: "Office supplies".into(),
            amount: Money::from_units(25),
            date: None,
            debit_parts: vec![Posting::new("acc_supplies", Money::from_units(25))],
            credit_parts: vec![Posting::new("acc_cash", Money::from_units(25))],
            vendor: Some("Paper Co".into()),
        };
        let entry = apply_suggestion(&storage, &good, today()).unwrap();
        assert_eq!(entry.date, today());
        assert_eq!(entry.description, "Office supplies (Paper Co)");

        let unbalanced = SuggestedEntry {
            credit_parts: vec![Posting::new("acc_cash", Money::from_units(20))],
            ..good.clone()
        };
        assert!(apply_suggestion(&storage, &unbalanced, today()).is_err());

        let unknown = SuggestedEntry {
            debit_parts: vec![Posting::new("acc_nowhere", Money::from_units(25))],
            ..good
        };
        assert!(apply_suggestion(&storage, &unknown, today()).is_err());
        assert_eq!(storage.journal.count().unwrap(), 1);
    }
}
