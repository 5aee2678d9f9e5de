use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::adapter::http::schema::user::UserResponse;
use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::admin::UserOverviewDTO;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub count: usize,
    pub users: Vec<UserResponse>,
}

impl UserListResponse {
    pub fn new(users: Vec<UserResponse>) -> Self {
        Self {
            count: users.len(),
            users,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SingleUserResponse {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserOverviewResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub district: String,
    pub taluka: String,
    pub police_station: String,
    pub registered_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_logout: Option<DateTime<Utc>>,
    pub login_count: usize,
    pub logout_count: i64,
    pub last_known_ip: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
}

impl From<UserOverviewDTO> for UserOverviewResponse {
    fn from(dto: UserOverviewDTO) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            email: dto.email,
            phone_number: dto.phone_number,
            district: dto.district,
            taluka: dto.taluka,
            police_station: dto.police_station,
            registered_at: dto.registered_at,
            last_login: dto.last_login,
            last_logout: dto.last_logout,
            login_count: dto.login_count,
            logout_count: dto.logout_count,
            last_known_ip: dto.last_known_ip,
            is_verified: dto.is_verified,
            is_active: dto.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewListResponse {
    pub count: usize,
    pub users: Vec<UserOverviewResponse>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LocationQuery {
    pub district: Option<String>,
    pub taluka: Option<String>,
    pub police_station: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    pub fn bounds(&self) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start_date.as_deref(), self.end_date.as_deref()) {
            (Some(start), Some(end)) if !start.trim().is_empty() && !end.trim().is_empty() => {
                Ok((parse_date(start)?, parse_date(end)?))
            }
            _ => Err(AppError::Validation("Start and end dates are required".to_string())),
        }
    }
}

/// Bare dates mean midnight UTC.
fn parse_date(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {raw}")))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::DateRangeQuery;
    use crate::application::app_error::AppError;

    fn query(start: Option<&str>, end: Option<&str>) -> DateRangeQuery {
        DateRangeQuery {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn bare_dates_are_midnight_utc() {
        let (from, to) = query(Some("2024-01-01"), Some("2024-01-31")).bounds().unwrap();

        assert_eq!(from, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn rfc3339_offsets_are_normalized() {
        let (from, _) = query(Some("2024-01-01T05:30:00+05:30"), Some("2024-02-01")).bounds().unwrap();

        assert_eq!(from, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[rstest]
    #[case(None, Some("2024-01-31"))]
    #[case(Some("2024-01-01"), None)]
    #[case(Some(""), Some("2024-01-31"))]
    #[case(Some("yesterday"), Some("2024-01-31"))]
    fn incomplete_or_malformed_range_is_rejected(#[case] start: Option<&str>, #[case] end: Option<&str>) {
        let result = query(start, end).bounds();

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
