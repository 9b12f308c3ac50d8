//! Table reservation route handlers.
//!
//! Bookings are simulated: a valid request waits the configured delay, is
//! logged and gets a confirmation. Nothing is stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use jyoti_core::reservation::GUESTS;
use jyoti_core::{Reservation, ReservationRequest, TimeSlot};

use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Shown once a booking is accepted.
pub const CONFIRMATION_MESSAGE: &str =
    "We look forward to serving you. A confirmation SMS has been sent to your phone.";

/// Reservation form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/reservation_form.html")]
pub struct ReservationFormTemplate {
    pub time_slots: Vec<&'static str>,
    pub min_guests: u8,
    pub max_guests: u8,
    pub error: Option<String>,
}

impl ReservationFormTemplate {
    fn new(error: Option<String>) -> Self {
        Self {
            time_slots: TimeSlot::ALL.iter().map(|slot| slot.label()).collect(),
            min_guests: *GUESTS.start(),
            max_guests: *GUESTS.end(),
            error,
        }
    }
}

/// Reservation confirmation fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/reservation_confirmed.html")]
pub struct ReservationConfirmedTemplate {
    pub reservation: Reservation,
    pub message: &'static str,
}

/// Display the reservation form.
#[instrument]
pub async fn new() -> ReservationFormTemplate {
    ReservationFormTemplate::new(None)
}

/// Submit a reservation (HTMX).
///
/// Invalid input re-renders the form with the first problem found.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ReservationRequest>,
) -> Response {
    let reservation = match form.validate() {
        Ok(reservation) => reservation,
        Err(e) => {
            info!(error = %e, "reservation rejected");
            return ReservationFormTemplate::new(Some(e.to_string())).into_response();
        }
    };

    tokio::time::sleep(state.config().reservation_delay).await;

    info!(
        date = %reservation.date,
        time = %reservation.time,
        guests = ?reservation.guests,
        "table reserved"
    );
    add_breadcrumb(
        "reservation",
        "Table reserved",
        &[("time", reservation.time.label())],
    );

    ReservationConfirmedTemplate {
        reservation,
        message: CONFIRMATION_MESSAGE,
    }
    .into_response()
}
