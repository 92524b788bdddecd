use crate::db::Storage;
use crate::error::{ServiceError, ServiceResult, require};
use crate::model::Registro;
use tracing::{info, instrument, warn};

pub struct RegistrationService {
    storage: Storage,
}

impl RegistrationService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Records a check-in for `codigo` on `turno`, at most once per calendar day.
    ///
    /// The `exists_today` lookup only saves a round trip for the common repeat
    /// case. Concurrent callers can both pass it; the storage unique key then
    /// rejects all but one insert and that rejection surfaces as `Duplicate`.
    #[instrument(skip(self))]
    pub async fn register(&self, codigo: &str, turno: &str) -> ServiceResult<Registro> {
        let codigo = require("codigo", codigo)?;
        let turno = require("turno", turno)?;

        if self.storage.exists_today(codigo, turno).await? {
            warn!(codigo, turno, "Already registered today");
            return Err(ServiceError::Duplicate);
        }

        match self.storage.insert(codigo, turno).await {
            Ok(registro) => {
                info!(id = registro.id, codigo, turno, "Check-in registered");
                Ok(registro)
            }
            Err(e) => {
                let err = ServiceError::from(e);
                if matches!(err, ServiceError::Duplicate) {
                    warn!(codigo, turno, "Lost concurrent registration race");
                }
                Err(err)
            }
        }
    }
}
