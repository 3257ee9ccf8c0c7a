//! Report endpoints
//!
//! - GET {base}/report      - Grading overview and per-teacher table (viewer)
//! - GET {base}/survey      - Install attribution by referral source (viewer)
//! - GET {base}/submissions - Reviewed submissions of one teacher (admin)
//!
//! Every endpoint is also served without the base path prefix.

use hyper::http::request::Parts;
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::auth::{authenticate, authorize, Claims, Role};
use crate::report::{
    GradingParams, GradingReport, InstallReport, SubmissionParams, SubmissionReport, SurveyParams,
};
use crate::routes::response::{error_response, json_response, parse_query, BoxBody};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportEndpoint {
    Grading,
    Survey,
    Submissions,
}

impl ReportEndpoint {
    /// Resolve a request path, with or without `base_path` in front
    pub fn match_path(base_path: &str, path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        let rest = if base_path.is_empty() {
            path
        } else {
            path.strip_prefix(base_path)
                .filter(|rest| rest.starts_with('/'))
                .unwrap_or(path)
        };

        match rest {
            "/report" => Some(Self::Grading),
            "/survey" => Some(Self::Survey),
            "/submissions" => Some(Self::Submissions),
            _ => None,
        }
    }

    pub fn required_role(self) -> Role {
        match self {
            Self::Grading | Self::Survey => Role::Viewer,
            Self::Submissions => Role::Admin,
        }
    }
}

impl std::fmt::Display for ReportEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Grading => "report",
            Self::Survey => "survey",
            Self::Submissions => "submissions",
        };
        f.write_str(name)
    }
}

/// Run the auth check and the selected report
pub async fn handle_report_request<B>(
    endpoint: ReportEndpoint,
    req: Request<B>,
    state: &AppState,
) -> Response<BoxBody> {
    let cors = state.cors_origin.as_str();
    let (parts, _body) = req.into_parts();

    let claims = match check_access(endpoint, &parts, state) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Denied {} report: {}", endpoint, e);
            return error_response(e, cors);
        }
    };
    debug!("{} report requested by {}", endpoint, claims.sub);

    let query = parts.uri.query();
    let result = match endpoint {
        ReportEndpoint::Grading => grading(query, state).await,
        ReportEndpoint::Survey => survey(query, state).await,
        ReportEndpoint::Submissions => submissions(query, state).await,
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            if e.status_code().is_server_error() {
                error!("{} report failed: {}", endpoint, e);
            }
            error_response(e, cors)
        }
    }
}

fn check_access(endpoint: ReportEndpoint, parts: &Parts, state: &AppState) -> Result<Claims> {
    let auth_header = parts
        .headers
        .get(hyper::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let claims = authenticate(&state.jwt, auth_header)?;
    authorize(&claims, endpoint.required_role())?;
    Ok(claims)
}

fn ok_json<T: Serialize>(body: &T, state: &AppState) -> Result<Response<BoxBody>> {
    Ok(json_response(StatusCode::OK, body, &state.cors_origin))
}

async fn grading(query: Option<&str>, state: &AppState) -> Result<Response<BoxBody>> {
    let request = parse_query::<GradingParams>(query)?.into_request()?;

    let summary = GradingReport::new(state.store.as_ref(), state.tables.allow_list.as_ref())
        .build(&request)
        .await?;
    ok_json(&summary, state)
}

async fn survey(query: Option<&str>, state: &AppState) -> Result<Response<BoxBody>> {
    let range = parse_query::<SurveyParams>(query)?.into_range()?;

    let rows = InstallReport::new(state.store.as_ref(), &state.tables.agents)
        .build(&range)
        .await?;
    ok_json(&rows, state)
}

async fn submissions(query: Option<&str>, state: &AppState) -> Result<Response<BoxBody>> {
    let request = parse_query::<SubmissionParams>(query)?.into_request()?;

    let rows = SubmissionReport::new(state.store.as_ref())
        .build(&request)
        .await?;
    ok_json(&rows, state)
}
