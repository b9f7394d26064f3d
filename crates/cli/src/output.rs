//! Terminal rendering: comfy tables by default, JSON with `--json`.

use std::fmt::Display;

use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use pharmacy_admin::services::{ChartSeries, DashboardData};
use pharmacy_admin_core::{Medicine, Pharmacy, User, UserStatistics, WorkingHours};

use crate::commands::CliError;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or the table built by `table`.
    #[allow(clippy::print_stdout)]
    pub fn emit<T>(&self, value: &T, table: impl FnOnce(&T) -> Table) -> Result<(), CliError>
    where
        T: Serialize + ?Sized,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", table(value));
        }
        Ok(())
    }

    /// Print a one-line confirmation. Suppressed in JSON mode.
    #[allow(clippy::print_stdout)]
    pub fn note(&self, text: impl Display) {
        if !self.json {
            println!("{text}");
        }
    }
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

pub fn pharmacies(items: &[Pharmacy]) -> Table {
    let mut t = table(&["ID", "Title", "Status", "Address", "Medicines"]);
    for p in items {
        t.add_row(vec![
            p.id.to_string(),
            p.title.clone(),
            p.status.to_string(),
            or_dash(p.location.as_ref().and_then(|l| l.address.as_deref())),
            p.medicine_count.map_or_else(|| "-".to_string(), |n| n.to_string()),
        ]);
    }
    t
}

pub fn pharmacy(p: &Pharmacy) -> Table {
    let mut t = table(&["Field", "Value"]);
    t.add_row(vec!["ID".to_string(), p.id.to_string()]);
    t.add_row(vec!["Title".to_string(), p.title.clone()]);
    t.add_row(vec!["Description".to_string(), p.description.clone()]);
    t.add_row(vec!["Status".to_string(), p.status.to_string()]);
    t.add_row(vec!["Image".to_string(), or_dash(p.image_url.as_deref())]);
    if let Some(location) = &p.location {
        t.add_row(vec![
            "Location".to_string(),
            format!("{:.5}, {:.5}", location.latitude, location.longitude),
        ]);
        t.add_row(vec!["Address".to_string(), or_dash(location.address.as_deref())]);
    }
    t.add_row(vec!["Hours".to_string(), hours(&p.working_hours)]);
    t
}

fn hours(week: &WorkingHours) -> String {
    week.days()
        .iter()
        .map(|d| {
            if d.is_open {
                format!(
                    "{} {}-{}",
                    d.day,
                    d.open_time.format("%H:%M"),
                    d.close_time.format("%H:%M")
                )
            } else {
                format!("{} closed", d.day)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn medicines(items: &[Medicine]) -> Table {
    let mut t = table(&["ID", "Title", "Status", "Description"]);
    for m in items {
        t.add_row(vec![
            m.id.to_string(),
            m.title.clone(),
            m.status.to_string(),
            m.description.clone(),
        ]);
    }
    t
}

pub fn medicine(m: &Medicine) -> Table {
    let mut t = table(&["Field", "Value"]);
    t.add_row(vec!["ID".to_string(), m.id.to_string()]);
    t.add_row(vec!["Title".to_string(), m.title.clone()]);
    t.add_row(vec!["Description".to_string(), m.description.clone()]);
    t.add_row(vec!["Status".to_string(), m.status.to_string()]);
    t.add_row(vec!["Front".to_string(), or_dash(m.front_image_url.as_deref())]);
    t.add_row(vec!["Back".to_string(), or_dash(m.back_image_url.as_deref())]);
    t
}

pub fn users(items: &[User]) -> Table {
    let mut t = table(&["ID", "Name", "Email", "Status"]);
    for u in items {
        t.add_row(vec![
            u.id.to_string(),
            u.name.clone(),
            u.email.clone(),
            u.status.to_string(),
        ]);
    }
    t
}

pub fn user(u: &User) -> Table {
    users(std::slice::from_ref(u))
}

pub fn statistics(stats: &UserStatistics) -> Table {
    let mut t = table(&["Total", "Active", "Banned"]);
    t.add_row(vec![
        stats.total_users.to_string(),
        stats.active_users.to_string(),
        stats.banned_users.to_string(),
    ]);
    t
}

pub fn dashboard(data: &DashboardData) -> Table {
    let s = &data.stats;
    let mut t = table(&["Metric", "Value"]);
    for (label, value) in [
        ("Pharmacies", s.total_pharmacies),
        ("Active pharmacies", s.active_pharmacies),
        ("Inactive pharmacies", s.inactive_pharmacies),
        ("Medicines", s.total_medicines),
        ("Available medicines", s.available_medicines),
        ("Users", s.total_users),
        ("Active users", s.active_users),
        ("Banned users", s.banned_users),
    ] {
        t.add_row(vec![label.to_string(), value.to_string()]);
    }
    if let Some(top) = &data.top_pharmacies {
        t.add_row(vec!["Top pharmacies".to_string(), series(top)]);
    }
    t
}

fn series(chart: &ChartSeries) -> String {
    chart
        .labels
        .iter()
        .zip(&chart.data)
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
