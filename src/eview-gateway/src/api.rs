// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::sync::Arc;

use actix_web::{get, post, web, Error, HttpResponse, Responder};
use serde::Deserialize;
use tracing::error;

use eview_core::{
    get_command, list_commands, ComposeError, SimulatedTransport, SubmissionPolicy, Submitter,
};
use eview_history::{HistoryLog, HistoryStore};
use eview_protocol::{
    describe_command, detail_command, draft_to_preview, parse_preview, parse_submit,
    receipt_to_response, submit_error_to_response, submit_request_to_core, CommandDescriptor,
    ErrorResponse,
};

/// Shared state behind every handler.
pub struct GatewayState {
    pub submitter: Submitter,
    pub history: Arc<HistoryStore>,
    /// History records returned when the query has no `limit`.
    pub query_limit: usize,
}

impl GatewayState {
    pub fn new(history: Arc<HistoryStore>, policy: SubmissionPolicy, query_limit: usize) -> Self {
        let submitter = Submitter::new(Arc::new(SimulatedTransport), history.clone(), policy);
        Self {
            submitter,
            history,
            query_limit,
        }
    }
}

fn error_body(code: &str, error: impl ToString) -> ErrorResponse {
    ErrorResponse {
        code: code.to_string(),
        error: error.to_string(),
    }
}

fn compose_error_body(err: &ComposeError) -> ErrorResponse {
    error_body(err.code(), err)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(commands_api)
        .service(command_detail)
        .service(preview)
        .service(send_command)
        .service(history_api);
}

#[get("/api/commands")]
pub async fn commands_api() -> impl Responder {
    let commands: Vec<CommandDescriptor> = list_commands().iter().map(describe_command).collect();
    HttpResponse::Ok().json(commands)
}

#[get("/api/commands/{id}")]
pub async fn command_detail(path: web::Path<String>) -> impl Responder {
    match get_command(&path) {
        Ok(spec) => HttpResponse::Ok().json(detail_command(spec)),
        Err(err) => HttpResponse::NotFound().json(compose_error_body(&err)),
    }
}

#[post("/api/preview")]
pub async fn preview(state: web::Data<GatewayState>, body: String) -> impl Responder {
    let req = match parse_preview(&body) {
        Ok(req) => req,
        Err(e) => return HttpResponse::BadRequest().json(error_body("invalid_request", e)),
    };
    match state.submitter.preview(&req.command, &req.params) {
        Ok(draft) => HttpResponse::Ok().json(draft_to_preview(&draft)),
        Err(err) => HttpResponse::BadRequest().json(compose_error_body(&err)),
    }
}

#[post("/api/send-command")]
pub async fn send_command(
    state: web::Data<GatewayState>,
    body: String,
) -> Result<HttpResponse, Error> {
    let req = match parse_submit(&body) {
        Ok(req) => req,
        Err(e) => return Ok(HttpResponse::BadRequest().json(error_body("invalid_request", e))),
    };
    let request = submit_request_to_core(req);

    let state = state.into_inner();
    let outcome = web::block(move || state.submitter.submit(&request))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(match outcome {
        Ok(receipt) => HttpResponse::Ok().json(receipt_to_response(receipt)),
        Err(err) if err.is_persistence_failure() => {
            HttpResponse::InternalServerError().json(submit_error_to_response(err))
        }
        Err(err) => HttpResponse::BadRequest().json(submit_error_to_response(err)),
    })
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[get("/api/history")]
pub async fn history_api(
    state: web::Data<GatewayState>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, Error> {
    let limit = query.limit.unwrap_or(state.query_limit);
    let state = state.into_inner();
    let records = web::block(move || state.history.recent(limit))
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?
        .map_err(|e| {
            error!("Failed to read history: {}", e);
            actix_web::error::ErrorInternalServerError(e.to_string())
        })?;
    Ok(HttpResponse::Ok().json(records))
}
