pub mod bookings;
pub mod films;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(films::routes())
        .merge(bookings::routes())
}
