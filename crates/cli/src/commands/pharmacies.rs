//! Pharmacy management commands.
//!
//! # Usage
//!
//! ```bash
//! pa-cli pharmacies list --status inactive
//! pa-cli pharmacies create -t "Cedars" --owner-name Rami --owner-email rami@x.com \
//!     --lat 33.89 --lon 35.50 --hours mon=09:00-18:00 --closed sun --image shop.jpg
//! pa-cli pharmacies update 65f1c0ffee --status inactive
//! ```

use std::path::{Path, PathBuf};

use chrono::Weekday;
use secrecy::ExposeSecret;

use pharmacy_admin::AdminClient;
use pharmacy_admin::services::ImageFile;
use pharmacy_admin_core::{
    Email, NewPharmacy, PharmacyId, PharmacyStatus, PharmacyUpdate, WorkingHours, parse_time,
};

use super::{CliError, location_from_args, parse_status, secret_or_prompt};
use crate::output::{self, Output};
use crate::{HoursArgs, LocationArgs};

pub struct CreateInput {
    pub title: String,
    pub description: String,
    pub image: Option<PathBuf>,
    pub location: LocationArgs,
    pub hours: HoursArgs,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_password: Option<String>,
    pub status: String,
}

pub struct UpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<PathBuf>,
    pub location: LocationArgs,
    pub hours: HoursArgs,
    pub status: Option<String>,
}

/// # Errors
///
/// Returns an error if the status is unknown or the request fails.
pub async fn list(app: &AdminClient, out: &Output, status: Option<&str>) -> Result<(), CliError> {
    let items = match status {
        Some(raw) => {
            app.pharmacies
                .list_by_status(parse_status::<PharmacyStatus>(raw)?)
                .await?
        }
        None => app.pharmacies.list().await?,
    };
    out.emit(items.as_slice(), output::pharmacies)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn show(app: &AdminClient, out: &Output, id: &str) -> Result<(), CliError> {
    let pharmacy = app.pharmacies.get(&PharmacyId::new(id)).await?;
    out.emit(&pharmacy, output::pharmacy)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn search(app: &AdminClient, out: &Output, query: &str) -> Result<(), CliError> {
    let items = app.pharmacies.search(query).await?;
    out.emit(items.as_slice(), output::pharmacies)
}

/// Upload the photo (if any) first, then create the pharmacy with its URL.
///
/// # Errors
///
/// Returns a validation error before any request, or the backend's rejection.
pub async fn create(app: &AdminClient, out: &Output, input: CreateInput) -> Result<(), CliError> {
    let owner_email = Email::parse(&input.owner_email)
        .map_err(pharmacy_admin::ValidationError::from)?;
    let status = parse_status::<PharmacyStatus>(&input.status)?;
    let mut working_hours = WorkingHours::default();
    apply_hours(&mut working_hours, &input.hours)?;
    let location = location_from_args(&input.location)?.unwrap_or_default();
    let owner_password = secret_or_prompt(input.owner_password, "Owner password")?;

    let image_url = match &input.image {
        Some(path) => Some(upload(app, path).await?),
        None => None,
    };

    let pharmacy = NewPharmacy {
        title: input.title,
        description: input.description,
        image_url,
        location,
        owner_name: input.owner_name,
        owner_email,
        owner_password: owner_password.expose_secret().to_string(),
        working_hours,
        status,
    };
    let created = app.pharmacies.create(&pharmacy).await?;
    out.note(format!("Created pharmacy {}", created.id));
    out.emit(&created, output::pharmacy)
}

/// Hours flags edit the pharmacy's current schedule rather than replace it.
///
/// # Errors
///
/// Returns `Nothing to update` if no flag was given, or the backend's rejection.
pub async fn update(
    app: &AdminClient,
    out: &Output,
    id: &str,
    input: UpdateInput,
) -> Result<(), CliError> {
    let id = PharmacyId::new(id);

    let working_hours = if input.hours.hours.is_empty() && input.hours.closed.is_empty() {
        None
    } else {
        let mut hours = app.pharmacies.get(&id).await?.working_hours;
        apply_hours(&mut hours, &input.hours)?;
        Some(hours)
    };

    let image_url = match &input.image {
        Some(path) => Some(upload(app, path).await?),
        None => None,
    };

    let update = PharmacyUpdate {
        title: input.title,
        description: input.description,
        image_url,
        location: location_from_args(&input.location)?,
        working_hours,
        status: input
            .status
            .as_deref()
            .map(parse_status::<PharmacyStatus>)
            .transpose()?,
    };
    let updated = app.pharmacies.update(&id, &update).await?;
    out.emit(&updated, output::pharmacy)
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn delete(app: &AdminClient, id: &str) -> Result<(), CliError> {
    app.pharmacies.delete(&PharmacyId::new(id)).await?;
    tracing::info!(id, "Pharmacy deleted");
    Ok(())
}

/// # Errors
///
/// Returns an error if the file cannot be read or the upload fails.
pub async fn upload_image(app: &AdminClient, out: &Output, path: &Path) -> Result<(), CliError> {
    let url = upload(app, path).await?;
    out.emit(&url, |url| {
        let mut table = comfy_table::Table::new();
        table.set_header(vec!["Image URL"]);
        table.add_row(vec![url.as_str()]);
        table
    })
}

async fn upload(app: &AdminClient, path: &Path) -> Result<String, CliError> {
    let image = ImageFile::from_path(path).await?;
    Ok(app.pharmacies.upload_image(image).await?)
}

/// Apply `--hours DAY=HH:MM-HH:MM` and `--closed DAY` flags to a schedule.
fn apply_hours(hours: &mut WorkingHours, args: &HoursArgs) -> Result<(), CliError> {
    for raw in &args.hours {
        let (day, open, close) = parse_day_hours(raw)?;
        if !is_open(hours, day) {
            hours.toggle(day);
        }
        hours.set_open_time(day, open);
        hours.set_close_time(day, close);
    }
    for raw in &args.closed {
        let day = parse_day(raw)?;
        if is_open(hours, day) {
            hours.toggle(day);
        }
    }
    hours
        .validate()
        .map_err(pharmacy_admin::ValidationError::from)?;
    Ok(())
}

fn is_open(hours: &WorkingHours, day: Weekday) -> bool {
    hours.days().iter().any(|d| d.day == day && d.is_open)
}

fn parse_day(raw: &str) -> Result<Weekday, CliError> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| CliError::InvalidArgument(format!("unknown day '{raw}'")))
}

fn parse_day_hours(
    raw: &str,
) -> Result<(Weekday, chrono::NaiveTime, chrono::NaiveTime), CliError> {
    let invalid = || CliError::InvalidArgument(format!("expected DAY=HH:MM-HH:MM, got '{raw}'"));

    let (day, range) = raw.split_once('=').ok_or_else(invalid)?;
    let (open, close) = range.split_once('-').ok_or_else(invalid)?;
    let day = parse_day(day)?;
    let open = parse_time(open).map_err(pharmacy_admin::ValidationError::from)?;
    let close = parse_time(close).map_err(pharmacy_admin::ValidationError::from)?;
    Ok((day, open, close))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn hours_args(hours: &[&str], closed: &[&str]) -> HoursArgs {
        HoursArgs {
            hours: hours.iter().map(ToString::to_string).collect(),
            closed: closed.iter().map(ToString::to_string).collect(),
        }
    }

    fn day(week: &WorkingHours, day: Weekday) -> pharmacy_admin_core::DaySchedule {
        week.days().iter().find(|d| d.day == day).cloned().unwrap()
    }

    #[test]
    fn test_parse_day_hours() {
        let (day, open, close) = parse_day_hours("mon=09:00-18:30").unwrap();
        assert_eq!(day, Weekday::Mon);
        assert_eq!(open, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(close, NaiveTime::from_hms_opt(18, 30, 0).unwrap());

        assert!(matches!(
            parse_day_hours("monday 9-5"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_day_hours("funday=09:00-10:00"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_apply_hours_sets_and_closes_days() {
        let mut week = WorkingHours::default();
        apply_hours(&mut week, &hours_args(&["sat=10:00-14:00"], &["sun"])).unwrap();

        let sat = day(&week, Weekday::Sat);
        assert!(sat.is_open);
        assert_eq!(sat.open_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert!(!day(&week, Weekday::Sun).is_open);
        assert!(day(&week, Weekday::Mon).is_open);
    }

    #[test]
    fn test_apply_hours_reopens_closed_day() {
        let mut week = WorkingHours::default();
        week.toggle(Weekday::Tue);
        apply_hours(&mut week, &hours_args(&["tue=08:00-12:00"], &[])).unwrap();
        assert!(day(&week, Weekday::Tue).is_open);
    }

    #[test]
    fn test_apply_hours_rejects_inverted_range() {
        let mut week = WorkingHours::default();
        let err = apply_hours(&mut week, &hours_args(&["wed=18:00-09:00"], &[])).unwrap_err();
        assert_eq!(err.to_string(), "Wednesday: closing time must be after opening time");
    }
}
