//! Dashboard statistics and chart series.
//!
//! The three resource lists are fetched concurrently, then aggregated
//! locally. Aggregation is a pure function so it can be tested without a
//! backend.

use serde::Serialize;
use tracing::instrument;

use pharmacy_admin_core::{Medicine, MedicineStatus, Pharmacy, PharmacyStatus, User, UserStatus};

use super::medicines::MedicineService;
use super::pharmacies::PharmacyService;
use super::users::UserService;
use crate::error::AdminError;
use crate::http::HttpClient;

/// How many pharmacies the "top pharmacies" chart shows.
pub const TOP_PHARMACIES: usize = 6;

const GREEN: &str = "#10b981";
const GRAY: &str = "#6b7280";
const RED: &str = "#ef4444";
const BLUE: &str = "#3b82f6";
const AMBER: &str = "#f59e0b";

const TOP_PALETTE: [&str; TOP_PHARMACIES] = [
    "rgba(59, 130, 246, 0.8)",
    "rgba(16, 185, 129, 0.8)",
    "rgba(251, 146, 60, 0.8)",
    "rgba(168, 85, 247, 0.8)",
    "rgba(236, 72, 153, 0.8)",
    "rgba(234, 179, 8, 0.8)",
];

/// Headline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_pharmacies: usize,
    pub active_pharmacies: usize,
    pub inactive_pharmacies: usize,
    pub total_medicines: usize,
    pub available_medicines: usize,
    pub total_users: usize,
    pub active_users: usize,
    pub banned_users: usize,
}

/// One chart's worth of data: parallel label, value and colour lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub colors: Vec<String>,
}

impl ChartSeries {
    fn push(&mut self, label: impl Into<String>, value: u64, color: &str) {
        self.labels.push(label.into());
        self.data.push(value);
        self.colors.push(color.to_string());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sum of all values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }
}

/// Everything the dashboard screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub pharmacy_status: ChartSeries,
    pub medicine_status: ChartSeries,
    pub user_status: ChartSeries,
    /// Present only when the backend reports per-pharmacy medicine counts.
    pub top_pharmacies: Option<ChartSeries>,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    pharmacies: PharmacyService,
    medicines: MedicineService,
    users: UserService,
}

impl DashboardService {
    #[must_use]
    pub fn new(http: &HttpClient) -> Self {
        Self {
            pharmacies: PharmacyService::new(http.clone()),
            medicines: MedicineService::new(http.clone()),
            users: UserService::new(http.clone()),
        }
    }

    /// Fetch pharmacies, medicines and users in parallel and aggregate them.
    ///
    /// # Errors
    ///
    /// Returns the first error among the three fetches.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<DashboardData, AdminError> {
        let (pharmacies, medicines, users) = tokio::try_join!(
            self.pharmacies.list(),
            self.medicines.list(),
            self.users.list(),
        )?;
        Ok(aggregate(&pharmacies, &medicines, &users))
    }
}

fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| pred(item)).count()
}

fn as_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Build counters and chart series from the raw lists.
#[must_use]
pub fn aggregate(pharmacies: &[Pharmacy], medicines: &[Medicine], users: &[User]) -> DashboardData {
    let active_pharmacies = count(pharmacies, |p| p.status == PharmacyStatus::Active);
    let available_medicines = count(medicines, |m| m.status == MedicineStatus::Available);
    let banned_users = count(users, |u| u.status == UserStatus::Banned);

    let stats = DashboardStats {
        total_pharmacies: pharmacies.len(),
        active_pharmacies,
        inactive_pharmacies: pharmacies.len() - active_pharmacies,
        total_medicines: medicines.len(),
        available_medicines,
        total_users: users.len(),
        active_users: users.len() - banned_users,
        banned_users,
    };

    let mut pharmacy_status = ChartSeries::default();
    pharmacy_status.push("Active", as_u64(stats.active_pharmacies), GREEN);
    pharmacy_status.push("Inactive", as_u64(stats.inactive_pharmacies), GRAY);

    let mut medicine_status = ChartSeries::default();
    medicine_status.push("Available", as_u64(stats.available_medicines), BLUE);
    medicine_status.push(
        "Unavailable",
        as_u64(stats.total_medicines - stats.available_medicines),
        AMBER,
    );

    let mut user_status = ChartSeries::default();
    user_status.push("Active", as_u64(stats.active_users), GREEN);
    user_status.push("Banned", as_u64(stats.banned_users), RED);

    DashboardData {
        stats,
        pharmacy_status,
        medicine_status,
        user_status,
        top_pharmacies: top_pharmacies(pharmacies),
    }
}

/// Pharmacies ranked by medicine count, ties broken by title.
fn top_pharmacies(pharmacies: &[Pharmacy]) -> Option<ChartSeries> {
    let mut ranked: Vec<(&str, u64)> = pharmacies
        .iter()
        .filter_map(|p| p.medicine_count.map(|n| (p.title.as_str(), n)))
        .collect();
    if ranked.is_empty() {
        return None;
    }
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut series = ChartSeries::default();
    for ((title, n), color) in ranked.into_iter().zip(TOP_PALETTE) {
        series.push(title, n, color);
    }
    Some(series)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pharmacy_admin_core::{MedicineId, PharmacyId, UserId, WorkingHours};

    fn pharmacy(title: &str, status: PharmacyStatus, medicines: Option<u64>) -> Pharmacy {
        Pharmacy {
            id: PharmacyId::new(title),
            title: title.to_string(),
            description: String::new(),
            image_url: None,
            location: None,
            working_hours: WorkingHours::default(),
            status,
            medicine_count: medicines,
        }
    }

    fn medicine(status: MedicineStatus) -> Medicine {
        Medicine {
            id: MedicineId::new("m"),
            title: "Panadol".to_string(),
            description: String::new(),
            front_image_url: None,
            back_image_url: None,
            status,
        }
    }

    fn user(status: UserStatus) -> User {
        User {
            id: UserId::new("u"),
            name: "Lina".to_string(),
            email: "lina@x.com".to_string(),
            location: None,
            status,
        }
    }

    #[test]
    fn test_empty_lists() {
        let data = aggregate(&[], &[], &[]);
        assert_eq!(data.stats, DashboardStats::default());
        assert_eq!(data.pharmacy_status.total(), 0);
        assert!(data.top_pharmacies.is_none());
    }

    #[test]
    fn test_counts_and_series() {
        let pharmacies = [
            pharmacy("A", PharmacyStatus::Active, None),
            pharmacy("B", PharmacyStatus::Active, None),
            pharmacy("C", PharmacyStatus::Inactive, None),
        ];
        let medicines = [
            medicine(MedicineStatus::Available),
            medicine(MedicineStatus::Unavailable),
        ];
        let users = [
            user(UserStatus::Active),
            user(UserStatus::Banned),
            user(UserStatus::Banned),
        ];

        let data = aggregate(&pharmacies, &medicines, &users);
        assert_eq!(data.stats.total_pharmacies, 3);
        assert_eq!(data.stats.active_pharmacies, 2);
        assert_eq!(data.stats.inactive_pharmacies, 1);
        assert_eq!(data.stats.available_medicines, 1);
        assert_eq!(data.stats.active_users, 1);
        assert_eq!(data.stats.banned_users, 2);

        assert_eq!(data.pharmacy_status.labels, vec!["Active", "Inactive"]);
        assert_eq!(data.pharmacy_status.data, vec![2, 1]);
        assert_eq!(data.user_status.data, vec![1, 2]);
        assert_eq!(data.user_status.colors, vec![GREEN, RED]);
        assert_eq!(data.medicine_status.total(), 2);
    }

    #[test]
    fn test_top_pharmacies_ranked_and_capped() {
        let pharmacies: Vec<Pharmacy> = (0..8)
            .map(|i| pharmacy(&format!("P{i}"), PharmacyStatus::Active, Some(i)))
            .chain([pharmacy("Z", PharmacyStatus::Active, None)])
            .collect();

        let top = aggregate(&pharmacies, &[], &[]).top_pharmacies.unwrap();
        assert_eq!(top.labels.len(), TOP_PHARMACIES);
        assert_eq!(top.labels.first().unwrap(), "P7");
        assert_eq!(top.data, vec![7, 6, 5, 4, 3, 2]);
        assert_eq!(top.colors.len(), TOP_PHARMACIES);
    }
}
