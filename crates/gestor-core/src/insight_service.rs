//! Builds the financial summary handed to the text-generation service and shields
//! callers from its failures.

use std::sync::atomic::{AtomicBool, Ordering};

use gestor_domain::AppData;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::aggregation_service::{AggregationService, CategoryTotal};

/// Shown to the user whenever the provider cannot produce an answer.
pub const INSIGHT_FAILURE_MESSAGE: &str =
    "Não foi possível gerar insights no momento. Verifique sua conexão ou tente novamente mais tarde.";

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("missing API key (set `{0}`)")]
    MissingApiKey(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Something able to turn a prompt into generated text.
pub trait InsightProvider: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

/// Headline figures sent along with the prompt. Computed over the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub contract_monthly_potential: f64,
    pub expense_breakdown: Vec<CategoryTotal>,
}

impl InsightSummary {
    pub fn from_data(data: &AppData) -> Self {
        Self {
            total_revenue: AggregationService::total_revenue(&data.transactions),
            total_expenses: AggregationService::total_expense(&data.transactions),
            contract_monthly_potential: AggregationService::recurring_revenue(&data.contracts),
            expense_breakdown: AggregationService::expense_by_category(&data.transactions),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Como um consultor financeiro especialista em empresas de assessoria pública para RPPS, analise os seguintes dados:\n\
             - Receita Total Realizada: R$ {revenue}\n\
             - Despesa Total: R$ {expense}\n\
             - Receita Mensal Recorrente de Contratos: R$ {recurring}\n\
             - Quebra de Despesas: {breakdown}\n\
             \n\
             Temos 4 empresas no grupo. Os custos incluem viagens, hotéis e manutenção de carros.\n\
             Dê 3 dicas estratégicas para otimizar a lucratividade e controle de custos baseado nesses dados.\n\
             Seja conciso e profissional. Responda em Português.",
            revenue = plain_number(self.total_revenue),
            expense = plain_number(self.total_expenses),
            recurring = plain_number(self.contract_monthly_potential),
            breakdown = self.breakdown_json(),
        )
    }

    /// Compact `{"label":amount,...}` object in first-seen category order.
    fn breakdown_json(&self) -> String {
        let entries: Vec<String> = self
            .expense_breakdown
            .iter()
            .map(|entry| {
                let key = serde_json::to_string(&entry.category)
                    .unwrap_or_else(|_| format!("\"{}\"", entry.category));
                format!("{key}:{}", plain_number(entry.amount))
            })
            .collect();
        format!("{{{}}}", entries.join(","))
    }
}

/// Integral values print without a fractional part.
fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightReply {
    Text(String),
    /// Provider failed; carries the fixed user-facing message.
    Failed(String),
    /// A request is already in flight.
    Busy,
}

impl InsightReply {
    pub fn message(&self) -> Option<&str> {
        match self {
            InsightReply::Text(text) | InsightReply::Failed(text) => Some(text),
            InsightReply::Busy => None,
        }
    }
}

pub struct InsightService {
    provider: Box<dyn InsightProvider>,
    busy: AtomicBool,
}

impl InsightService {
    pub fn new(provider: Box<dyn InsightProvider>) -> Self {
        Self {
            provider,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Asks the provider for advice on `data`. Never fails: errors collapse into
    /// [`InsightReply::Failed`].
    pub fn request(&self, data: &AppData) -> InsightReply {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return InsightReply::Busy;
        };

        let prompt = InsightSummary::from_data(data).prompt();
        match self.provider.generate(&prompt) {
            Ok(text) => {
                info!(chars = text.len(), "insight received");
                InsightReply::Text(text)
            }
            Err(err) => {
                warn!(error = %err, "insight request failed");
                InsightReply::Failed(INSIGHT_FAILURE_MESSAGE.to_string())
            }
        }
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Arc, Mutex};

    struct Canned(Result<String, String>);

    impl InsightProvider for Canned {
        fn generate(&self, _prompt: &str) -> Result<String, InsightError> {
            self.0.clone().map_err(InsightError::Transport)
        }
    }

    #[test]
    fn provider_failure_becomes_fixed_message() {
        let service = InsightService::new(Box::new(Canned(Err("offline".into()))));
        assert_eq!(
            service.request(&AppData::seed()),
            InsightReply::Failed(INSIGHT_FAILURE_MESSAGE.to_string())
        );
        assert!(!service.is_busy());
    }

    #[test]
    fn success_returns_provider_text() {
        let service = InsightService::new(Box::new(Canned(Ok("Reduza viagens.".into()))));
        let reply = service.request(&AppData::seed());
        assert_eq!(reply.message(), Some("Reduza viagens."));
    }

    #[test]
    fn prompt_embeds_totals_and_breakdown() {
        let summary = InsightSummary {
            total_revenue: 1000.0,
            total_expenses: 400.5,
            contract_monthly_potential: 5000.0,
            expense_breakdown: vec![
                CategoryTotal {
                    category: "Viagem".into(),
                    amount: 300.0,
                },
                CategoryTotal {
                    category: "Diária Hotel".into(),
                    amount: 100.5,
                },
            ],
        };
        let prompt = summary.prompt();
        assert!(prompt.contains("Receita Total Realizada: R$ 1000\n"));
        assert!(prompt.contains("Despesa Total: R$ 400.5\n"));
        assert!(prompt.contains("Contratos: R$ 5000\n"));
        assert!(prompt.contains(r#"{"Viagem":300,"Diária Hotel":100.5}"#));
        assert!(prompt.ends_with("Responda em Português."));
    }

    struct Blocking {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl InsightProvider for Blocking {
        fn generate(&self, _prompt: &str) -> Result<String, InsightError> {
            if let Ok(tx) = self.entered.lock() {
                let _ = tx.send(());
            }
            if let Ok(rx) = self.release.lock() {
                let _ = rx.recv();
            }
            Ok("ok".into())
        }
    }

    #[test]
    fn concurrent_request_reports_busy() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let service = Arc::new(InsightService::new(Box::new(Blocking {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        })));

        let worker = {
            let service = Arc::clone(&service);
            std::thread::spawn(move || service.request(&AppData::seed()))
        };
        entered_rx.recv().unwrap();
        assert!(service.is_busy());
        assert_eq!(service.request(&AppData::seed()), InsightReply::Busy);

        release_tx.send(()).unwrap();
        assert_eq!(worker.join().unwrap(), InsightReply::Text("ok".into()));
        assert!(!service.is_busy());
    }
}
