use serde::{Deserialize, Serialize};

/// Rows returned by one statement, in store order
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StatementState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl StatementState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StatementState::Succeeded | StatementState::Failed)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatementOutcome {
    /// 1-based position in the script
    pub index: usize,
    pub sql: String,
    pub state: StatementState,
    pub row_count: Option<usize>,
    pub error: Option<String>,
}

impl StatementOutcome {
    pub fn pending(index: usize, sql: String) -> Self {
        Self {
            index,
            sql,
            state: StatementState::Pending,
            row_count: None,
            error: None,
        }
    }

    pub fn start(&mut self) {
        self.state = StatementState::Running;
    }

    pub fn succeed(&mut self, row_count: usize) {
        self.state = StatementState::Succeeded;
        self.row_count = Some(row_count);
    }

    pub fn fail(&mut self, error: String) {
        self.state = StatementState::Failed;
        self.error = Some(error);
    }
}

/// Outcome of a whole script run. Completed once every statement reached
/// a terminal state, whatever the individual results.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub outcomes: Vec<StatementOutcome>,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        self.outcomes.iter().all(|o| o.state.is_terminal())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == StatementState::Succeeded)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == StatementState::Failed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_transitions() {
        let mut outcome = StatementOutcome::pending(1, "SELECT 1".to_string());
        assert_eq!(outcome.state, StatementState::Pending);
        outcome.start();
        assert!(!outcome.state.is_terminal());
        outcome.fail("no such table: nope".to_string());
        assert_eq!(outcome.state, StatementState::Failed);
        assert_eq!(outcome.error.as_deref(), Some("no such table: nope"));
    }

    #[test]
    fn test_report_completed_despite_failures() {
        let mut ok = StatementOutcome::pending(1, "SELECT 1".to_string());
        ok.start();
        ok.succeed(1);
        let mut bad = StatementOutcome::pending(2, "SELEC".to_string());
        bad.start();
        bad.fail("syntax error".to_string());

        let report = RunReport {
            outcomes: vec![ok, bad],
        };
        assert!(report.is_completed());
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
    }
}
