use sea_orm::{ActiveValue, ConnectionTrait, DatabaseTransaction, QuerySelect, Statement, prelude::*};

use crate::{ResultEngine, sequences, sequences::IdKind};

use super::Engine;

impl Engine {
    /// Returns the next identifier for `kind` (`REQ0000001`, `BUD0000001`,
    /// ...).
    ///
    /// Must run inside the caller's transaction: the counter row is read for
    /// update, so concurrent creators serialize on it and cannot hand out
    /// the same id twice.
    pub(super) async fn next_id(
        &self,
        db_tx: &DatabaseTransaction,
        kind: IdKind,
    ) -> ResultEngine<String> {
        let current = sequences::Entity::find_by_id(kind.as_str().to_string())
            .lock_exclusive()
            .one(db_tx)
            .await?;

        let next = match current {
            Some(row) => {
                let next = row.last_value + 1;
                let mut active: sequences::ActiveModel = row.into();
                active.last_value = ActiveValue::Set(next);
                active.update(db_tx).await?;
                next
            }
            None => {
                // First use on a database predating the counters: continue
                // from the largest suffix already stored.
                let next = self.max_stored_suffix(db_tx, kind).await? + 1;
                sequences::Model::active(kind, next).insert(db_tx).await?;
                next
            }
        };

        Ok(kind.render(next))
    }

    async fn max_stored_suffix(
        &self,
        db_tx: &DatabaseTransaction,
        kind: IdKind,
    ) -> ResultEngine<i64> {
        let backend = db_tx.get_database_backend();
        let stmt = Statement::from_string(backend, format!("SELECT id FROM {}", kind.table()));
        let rows = db_tx.query_all(stmt).await?;

        let mut max = 0;
        for row in rows {
            if let Ok(id) = row.try_get::<String>("", "id")
                && let Some(suffix) = kind.parse_suffix(&id)
            {
                max = max.max(suffix);
            }
        }
        Ok(max)
    }
}
