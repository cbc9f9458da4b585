/*!
 * # Demand Forecasting
 *
 * Projects each product's historical daily mean flat across the requested
 * horizon. There is no trend or seasonality term: every projected day carries
 * the same value.
 *
 * The projection starts the day after the latest observed date. Products with
 * no history are anchored on the injected [`Clock`].
 */

use crate::clock::Clock;
use crate::dto::{
    ForecastPoint, ForecastRequest, ForecastResponse, ForecastResponseItem, SeriesItem,
};
use crate::ml::stats::{mean, non_negative, round_to};
use chrono::{Days, NaiveDate};

const DAILY_AVG_DECIMALS: u32 = 4;

/// Forecasts every series in the request, preserving input order.
///
/// `history_days` is carried by the request for the consumer's benefit and
/// does not influence the result.
pub fn forecast(request: &ForecastRequest, clock: &dyn Clock) -> ForecastResponse {
    let horizon = u64::try_from(request.horizon_days).unwrap_or(0);

    let forecasts = request
        .series
        .iter()
        .map(|item| project_series(item, horizon, clock))
        .collect();

    ForecastResponse { forecasts }
}

/// Projects a single product.
pub fn project_series(item: &SeriesItem, horizon: u64, clock: &dyn Clock) -> ForecastResponseItem {
    let units: Vec<f64> = item.history.iter().map(|p| non_negative(p.unidades)).collect();
    let daily_avg = mean(&units);

    let last_date = item
        .history
        .iter()
        .map(|p| p.fecha)
        .max()
        .unwrap_or_else(|| clock.today());

    let forecast = (1..=horizon)
        .map(|offset| ForecastPoint {
            fecha: shift(last_date, offset),
            unidades: daily_avg,
        })
        .collect();

    ForecastResponseItem {
        producto_id: item.producto_id,
        producto_nombre: item.producto_nombre.clone(),
        daily_avg: round_to(daily_avg, DAILY_AVG_DECIMALS),
        forecast,
    }
}

// Request validation keeps the projection inside the calendar range.
fn shift(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
