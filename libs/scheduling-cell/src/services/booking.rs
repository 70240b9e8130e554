use tracing::{debug, info};
use uuid::Uuid;

use notification_cell::NotificationDispatcher;
use shared_config::AppConfig;
use shared_database::directory::{DirectoryClient, APPOINTMENTS};
use shared_models::auth::SessionIdentity;
use shared_models::records::{Appointment, STATUS_SCHEDULED};

use crate::models::{BookAppointmentRequest, SchedulingError};
use crate::services::roster::DoctorRosterService;

/// Appointment creation and the per-role appointment queries.
pub struct SchedulingService {
    store: DirectoryClient,
    roster: DoctorRosterService,
    dispatcher: NotificationDispatcher,
}

impl SchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DirectoryClient::new(config),
            roster: DoctorRosterService::new(config),
            dispatcher: NotificationDispatcher::new(config),
        }
    }

    /// Book an appointment for the calling patient. The doctor id is taken
    /// as submitted; nothing checks it against the roster, so a booking
    /// against an unknown doctor succeeds and is retrievable.
    pub async fn book_appointment(
        &self,
        identity: &SessionIdentity,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = Appointment {
            appointment_id: Uuid::new_v4().to_string(),
            doctor_id: request.doctor_id,
            patient_email: identity.username.clone(),
            date: request.date,
            reason: request.reason,
            status: STATUS_SCHEDULED.to_string(),
        };

        let stored = self.store.insert(APPOINTMENTS.name, &appointment).await?;

        info!(
            "Appointment {} booked with doctor {} for {}",
            stored.appointment_id, stored.doctor_id, stored.patient_email
        );

        // Advisory broadcast on a detached task; the booking above stands
        // whatever happens to the notification.
        self.dispatcher.spawn_broadcast(format!(
            "New appointment booked with Doctor ID {} on {} for {}",
            stored.doctor_id, stored.date, stored.patient_email
        ));

        Ok(stored)
    }

    /// Appointments for the calling doctor. The account is linked to its
    /// roster profile through the profile email; accounts without a profile
    /// fall back to matching the username against `doctor_id` directly,
    /// which is how the system behaved before profiles were linked.
    pub async fn appointments_for_doctor(
        &self,
        identity: &SessionIdentity,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let doctor_id = match self.roster.find_profile_for_account(&identity.username).await? {
            Some(profile) => profile.doctor_id,
            None => {
                debug!(
                    "No doctor profile linked to {}, filtering by username",
                    identity.username
                );
                identity.username.clone()
            }
        };

        let appointments = self
            .store
            .query_eq(APPOINTMENTS.name, "doctor_id", &doctor_id)
            .await?;
        Ok(appointments)
    }

    /// Appointments booked by the calling patient.
    pub async fn appointments_for_patient(
        &self,
        identity: &SessionIdentity,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let appointments = self
            .store
            .query_eq(APPOINTMENTS.name, "patient_email", &identity.username)
            .await?;
        Ok(appointments)
    }
}
