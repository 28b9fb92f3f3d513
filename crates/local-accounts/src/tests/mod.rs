use std::sync::Arc;

use chrono::{TimeZone, Utc};
use reader_store::Database;

use crate::AccountService;
use crate::clock::ManualClock;

fn test_service() -> (AccountService, Arc<ManualClock>) {
    let db = Database::open_in_memory().expect("Failed to create test DB");
    let start = Utc.with_ymd_and_hms(2024, 3, 11, 8, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    (AccountService::with_clock(db, clock.clone()), clock)
}

mod session;
