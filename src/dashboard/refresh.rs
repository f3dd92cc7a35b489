//! The dashboard refresh pass and its last-request-wins publication.
//!
//! A refresh fetches every record the dashboard needs, releases the
//! database lock, aggregates into a fresh snapshot and publishes it. When
//! requests overlap, tickets handed out at the start of each pass decide
//! which result may land in the published slot: a pass that finishes after
//! a newer one began its publish is discarded rather than letting an older
//! snapshot overwrite a newer one.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    Error,
    dashboard::{composer::build_snapshot, handlers::DashboardState, snapshot::DashboardSnapshot},
    expense::{fetch_material_orders, fetch_repair_reports, fetch_workers},
    inventory::fetch_materials,
    period::{Period, window_sequence},
    sale::fetch_sale_rows,
    timezone::current_local_date,
};

/// Holds the newest published snapshot and decides which refresh pass may
/// replace it.
///
/// Tickets are handed out in request order, so a publish with a ticket
/// older than the slot's is stale and gets dropped. The requester that ran
/// the stale pass still gets its own result back, only the shared slot
/// ignores it.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    next_ticket: AtomicU64,
    slot: Mutex<PublishedSnapshot>,
}

#[derive(Debug, Default)]
struct PublishedSnapshot {
    ticket: u64,
    snapshot: Option<Arc<DashboardSnapshot>>,
}

impl SnapshotPublisher {
    /// Creates a publisher with an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the ticket for a refresh pass that is about to start.
    pub fn begin(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Offers a finished snapshot to the slot.
    ///
    /// Returns whether the snapshot was accepted. A snapshot from a pass
    /// older than the one currently in the slot is dropped.
    pub fn publish(&self, ticket: u64, snapshot: Arc<DashboardSnapshot>) -> bool {
        let mut slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(error) => {
                tracing::error!("could not acquire snapshot slot lock: {error}");
                return false;
            }
        };

        if ticket < slot.ticket {
            tracing::debug!(
                "dropping stale snapshot from pass {ticket}, slot already holds pass {}",
                slot.ticket
            );
            return false;
        }

        slot.ticket = ticket;
        slot.snapshot = Some(snapshot);
        true
    }

    /// The newest published snapshot, if any pass has finished yet.
    pub fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        match self.slot.lock() {
            Ok(slot) => slot.snapshot.clone(),
            Err(error) => {
                tracing::error!("could not acquire snapshot slot lock: {error}");
                None
            }
        }
    }
}

/// Runs one full refresh pass and returns its snapshot.
///
/// All records are fetched under a single database lock before any
/// aggregation happens, so the snapshot reflects one instant. Any fetch
/// failure aborts the whole pass; a partially refreshed dashboard is never
/// produced. The returned snapshot is the one this pass built even when a
/// newer pass already owns the published slot.
///
/// # Errors
/// Returns [Error::DatabaseLockError] when the connection lock is
/// poisoned, [Error::InvalidTimezoneError] for an unrecognised timezone
/// name, or [Error::SqlError] when a query fails.
pub async fn run_refresh(
    state: &DashboardState,
    period: Period,
) -> Result<Arc<DashboardSnapshot>, Error> {
    let ticket = state.snapshot_publisher.begin();
    let today = current_local_date(&state.local_timezone)?;

    // Expenses only feed window-scoped figures, so their fetches can stay
    // bounded to the displayed windows. Sales cannot: the active order count
    // and the recent sales list look at the whole table.
    let windows = window_sequence(period, today, period.window_count());
    let first_day = windows.first().map_or(today, |window| window.start);
    let last_day = windows.last().map_or(today, |window| window.end);
    let date_range = first_day..=last_day;

    let (sales, materials, orders, workers, repairs) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let sales = fetch_sale_rows(&connection)
            .inspect_err(|error| tracing::error!("could not get sales: {error}"))?;
        let materials = fetch_materials(&connection)
            .inspect_err(|error| tracing::error!("could not get materials: {error}"))?;
        let orders = fetch_material_orders(date_range.clone(), &connection)
            .inspect_err(|error| tracing::error!("could not get material orders: {error}"))?;
        let workers = fetch_workers(&connection)
            .inspect_err(|error| tracing::error!("could not get workers: {error}"))?;
        let repairs = fetch_repair_reports(date_range, &connection)
            .inspect_err(|error| tracing::error!("could not get repair reports: {error}"))?;

        (sales, materials, orders, workers, repairs)
    };

    let snapshot = Arc::new(build_snapshot(
        period, today, &sales, &materials, &orders, &workers, &repairs,
    ));

    state.snapshot_publisher.publish(ticket, snapshot.clone());

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        dashboard::{composer::build_snapshot, handlers::DashboardState},
        db::initialize,
        period::Period,
        sale::{Sale, create_client, create_sale},
    };

    use super::{SnapshotPublisher, run_refresh};

    fn empty_snapshot() -> Arc<crate::dashboard::snapshot::DashboardSnapshot> {
        Arc::new(build_snapshot(
            Period::Day,
            date!(2025 - 10 - 05),
            &[],
            &[],
            &[],
            &[],
            &[],
        ))
    }

    #[test]
    fn tickets_increase_monotonically() {
        let publisher = SnapshotPublisher::new();

        assert_eq!(publisher.begin(), 1);
        assert_eq!(publisher.begin(), 2);
        assert_eq!(publisher.begin(), 3);
    }

    #[test]
    fn stale_pass_cannot_overwrite_a_newer_snapshot() {
        let publisher = SnapshotPublisher::new();
        let older = publisher.begin();
        let newer = publisher.begin();

        let newer_snapshot = empty_snapshot();
        assert!(publisher.publish(newer, newer_snapshot.clone()));
        assert!(!publisher.publish(older, empty_snapshot()));

        let latest = publisher.latest().unwrap();
        assert!(Arc::ptr_eq(&latest, &newer_snapshot));
    }

    #[test]
    fn latest_follows_in_order_publishes() {
        let publisher = SnapshotPublisher::new();
        assert_eq!(publisher.latest(), None);

        let first = publisher.begin();
        let second = publisher.begin();

        assert!(publisher.publish(first, empty_snapshot()));
        let second_snapshot = empty_snapshot();
        assert!(publisher.publish(second, second_snapshot.clone()));

        let latest = publisher.latest().unwrap();
        assert!(Arc::ptr_eq(&latest, &second_snapshot));
    }

    #[tokio::test]
    async fn refresh_builds_and_publishes_a_snapshot() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let client = create_client("Lucia Romero", &conn).unwrap();
        let today = time::OffsetDateTime::now_utc().date();
        create_sale(Sale::build(120.0, today).client_id(Some(client.id)), &conn).unwrap();

        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
            snapshot_publisher: Arc::new(SnapshotPublisher::new()),
        };

        let snapshot = run_refresh(&state, Period::Week).await.unwrap();

        assert_eq!(snapshot.period, Period::Week);
        assert_eq!(snapshot.metrics.sale_count, 1);
        assert_eq!(snapshot.metrics.net_income, 120.0);

        let published = state.snapshot_publisher.latest().unwrap();
        assert!(Arc::ptr_eq(&published, &snapshot));
    }
}
