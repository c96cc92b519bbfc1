use crate::http::error::AppError;
use crate::http::extract::TwilioRequest;
use crate::http::state::AppState;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use holdline_core::domain::{parse_duration_seconds, CallSid, CallStatus, CallerLocation};
use holdline_core::time::{now_utc, parse_provider_timestamp};
use holdline_core::twiml;
use holdline_store::repo::{CallStart, StatusUpdate};
use tracing::{debug, info, warn};

pub const HOLD_MUSIC_PATH: &str = "/please-hold.mp3";

pub async fn voice(
    State(state): State<AppState>,
    request: TwilioRequest,
) -> Result<Response, AppError> {
    let call_sid = required_sid(&request)?;
    let caller = state.processor.process(request.param("From"));
    let start = CallStart {
        call_sid: call_sid.clone(),
        caller,
        to_number: request.param("To").map(str::to_string),
        location: CallerLocation {
            city: request.param("FromCity").map(str::to_string),
            state: request.param("FromState").map(str::to_string),
            country: request.param("FromCountry").map(str::to_string),
        },
    };

    let now = now_utc();
    let recorded = state
        .with_store(move |store| store.calls().record_start(now, start))
        .await;

    let body = match recorded {
        Ok(call) => {
            info!(
                call_sid = %call.call_sid,
                caller = %call.caller.display_format,
                "call started"
            );
            let music_url = format!(
                "{}{HOLD_MUSIC_PATH}",
                request.origin.as_deref().unwrap_or_default()
            );
            twiml::hold_response(&state.settings.greeting, &music_url)
        }
        Err(err) => {
            warn!(call_sid = %call_sid, error = %err, "failed to record call start");
            twiml::apology_response()
        }
    };

    Ok(xml_response(body))
}

pub async fn status(
    State(state): State<AppState>,
    request: TwilioRequest,
) -> Result<Response, AppError> {
    let call_sid = required_sid(&request)?;
    let Some(raw_status) = request.param("CallStatus") else {
        warn!(call_sid = %call_sid, "status callback without CallStatus ignored");
        return Ok("OK".into_response());
    };
    let status = raw_status
        .parse::<CallStatus>()
        .map_err(|err| AppError::Validation(err.to_string()))?;
    let duration_seconds = request
        .param("CallDuration")
        .map(parse_duration_seconds)
        .transpose()
        .map_err(|err| AppError::Validation(err.to_string()))?;
    let ended_at = request
        .param("Timestamp")
        .and_then(|raw| match parse_provider_timestamp(raw) {
            Ok(ts) => Some(ts),
            Err(err) => {
                debug!(error = %err, "unparseable status timestamp, using now");
                None
            }
        });

    let update = StatusUpdate {
        call_sid: call_sid.clone(),
        status,
        duration_seconds,
        ended_at,
    };
    let now = now_utc();
    let matched = state
        .with_store(move |store| store.calls().apply_status(now, update))
        .await?;

    if matched {
        info!(call_sid = %call_sid, status = %status, "call status updated");
    } else {
        warn!(call_sid = %call_sid, status = %status, "status callback for unknown call");
    }

    Ok("OK".into_response())
}

fn required_sid(request: &TwilioRequest) -> Result<CallSid, AppError> {
    let raw = request
        .param("CallSid")
        .ok_or_else(|| AppError::Validation("missing CallSid".to_string()))?;
    CallSid::parse(raw).map_err(|err| AppError::Validation(err.to_string()))
}

fn xml_response(body: String) -> Response {
    (
        [(CONTENT_TYPE, twiml::CONTENT_TYPE), (CACHE_CONTROL, "no-cache")],
        body,
    )
        .into_response()
}
