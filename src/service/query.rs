use crate::db::Storage;
use crate::error::{ServiceResult, require};
use crate::model::Registro;
use tracing::debug;

pub struct QueryService {
    storage: Storage,
}

impl QueryService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Today's check-ins for `turno`, most recent first.
    pub async fn list(&self, turno: &str) -> ServiceResult<Vec<Registro>> {
        let turno = require("turno", turno)?;

        let registros = self.storage.list_today(turno).await?;
        debug!(turno, count = registros.len(), "Listed registros");
        Ok(registros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::memory_storage;
    use crate::error::ServiceError;
    use chrono::Duration;

    #[actix_web::test]
    async fn empty_shift_yields_empty_list() {
        let (storage, _clock) = memory_storage().await;
        let service = QueryService::new(storage);

        assert!(service.list("tarde").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn lists_newest_first_for_requested_shift() {
        let (storage, clock) = memory_storage().await;
        storage.insert("E-1", "tarde").await.unwrap();
        clock.advance(Duration::seconds(5));
        storage.insert("E-2", "tarde").await.unwrap();
        storage.insert("E-3", "mañana").await.unwrap();

        let service = QueryService::new(storage);
        let registros = service.list("tarde").await.unwrap();

        assert_eq!(registros.len(), 2);
        assert_eq!(registros[0].codigo, "E-2");
        assert!(registros[0].fecha > registros[1].fecha);
    }

    #[actix_web::test]
    async fn missing_turno_is_rejected() {
        let (storage, _clock) = memory_storage().await;
        let service = QueryService::new(storage);

        assert!(matches!(service.list("").await, Err(ServiceError::Validation(_))));
    }
}
