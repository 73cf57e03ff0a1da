use chrono::{DateTime, Utc};
use tracing::debug;

use super::Repository;
use crate::classify::{Entity, Operation};
use crate::error::DomainResult;
use crate::models::Task;
use crate::report::{build_report, ChoreReport, ReportRange};

impl Repository {
    /// Chore × user minutes for tasks started within `[start, end]`
    pub async fn get_chore_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<ChoreReport> {
        self.bounded(Entity::Report, Operation::List, async {
            let mut scope = self.begin(Entity::Report, Operation::List).await?;
            let rows = Task::sum_by_chore_and_user(scope.conn(), start, end)
                .await
                .map_err(|e| scope.fail(e))?;
            scope.commit().await?;

            debug!(%start, %end, pairs = rows.len(), "Aggregated chore report");
            Ok(build_report(rows))
        })
        .await
    }

    pub async fn get_chore_report_for(&self, range: ReportRange) -> DomainResult<ChoreReport> {
        self.get_chore_report(range.start, range.end).await
    }
}
