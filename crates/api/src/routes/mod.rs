pub mod accounts;
pub mod catalogue;
pub mod characters;
pub mod health;
pub mod search;
pub mod ticks;
pub mod transfer;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /accounts                               list, create
/// /accounts/order                         reorder (PUT)
/// /accounts/{id}                          get, update, delete
///
/// /characters                             list (?account_id=), create
/// /characters/{id}                        get, update, delete
/// /characters/{id}/ticks/{code}           tick (PUT), untick (DELETE)
///
/// /search                                 roster search (?q=)
///
/// /instances                              instance catalogue
/// /job-classes                            job-class taxonomy
///
/// /ticks                                  current tick table
/// /ticks/reset                            clear every tick (POST)
///
/// /export                                 download the roster
/// /import                                 import a roster document (POST)
/// /roster                                 delete everything (DELETE)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/characters", characters::router())
        .merge(search::router())
        .merge(catalogue::router())
        .nest("/ticks", ticks::router())
        .merge(transfer::router(config.max_import_bytes))
}
