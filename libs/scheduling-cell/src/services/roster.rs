use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::directory::{DirectoryClient, DOCTORS};
use shared_models::records::Doctor;

use crate::models::{RegisterDoctorRequest, SchedulingError};

/// The doctor roster: profile registration and the listing patients browse
/// when booking.
pub struct DoctorRosterService {
    store: DirectoryClient,
}

impl DoctorRosterService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DirectoryClient::new(config),
        }
    }

    /// Create a doctor profile with a fresh id. A profile is not a login
    /// account; the two are linked only through the profile email.
    pub async fn register_doctor(
        &self,
        request: RegisterDoctorRequest,
    ) -> Result<Doctor, SchedulingError> {
        let doctor = Doctor {
            doctor_id: Uuid::new_v4().to_string(),
            name: request.name,
            specialization: request.specialization,
            email: request.email,
        };

        let stored = self.store.insert(DOCTORS.name, &doctor).await?;
        info!("Registered doctor profile {} ({})", stored.name, stored.doctor_id);

        Ok(stored)
    }

    /// Full roster, unfiltered. Feeds the doctor-selection list on the
    /// booking form.
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, SchedulingError> {
        let doctors = self.store.scan(DOCTORS.name).await?;
        Ok(doctors)
    }

    /// Resolve the profile belonging to a doctor's login account. Accounts
    /// use the email address as username, so the profile email is the link.
    pub async fn find_profile_for_account(
        &self,
        username: &str,
    ) -> Result<Option<Doctor>, SchedulingError> {
        debug!("Resolving doctor profile for account {}", username);

        let mut matches: Vec<Doctor> = self
            .store
            .query_eq(DOCTORS.name, "email", username)
            .await?;

        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(matches.remove(0)))
    }
}
