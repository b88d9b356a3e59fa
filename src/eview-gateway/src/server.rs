// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::net::SocketAddr;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tokio::signal;
use tracing::info;

use crate::api::{self, GatewayState};

fn build_server(addr: SocketAddr, state: web::Data<GatewayState>) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::configure)
    })
    .shutdown_timeout(1)
    .disable_signals()
    .bind(addr)?
    .run();
    Ok(server)
}

/// Run the HTTP API until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: web::Data<GatewayState>) -> std::io::Result<()> {
    let server = build_server(addr, state)?;
    let handle = server.handle();
    tokio::spawn(async move {
        let _ = signal::ctrl_c().await;
        info!("Shutting down http api");
        handle.stop(true).await;
    });
    info!("http api listening on {}", addr);
    server.await
}
