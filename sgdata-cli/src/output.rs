//! Plain-text rendering of the typed responses.

use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset};
use sgdata_core::{CarparkResponse, ForecastResponse, PsiResponse};

/// Measurements shown by `sgdata psi`, in display order.
const PSI_COLUMNS: &[(&str, &str)] = &[
    ("psi_twenty_four_hourly", "PSI 24h"),
    ("pm25_sub_index", "PM2.5"),
    ("pm10_sub_index", "PM10"),
    ("o3_sub_index", "O3"),
    ("so2_sub_index", "SO2"),
    ("co_sub_index", "CO"),
];

fn stamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%d %H:%M %:z").to_string()
}

fn status_line(out: &mut String, status: &str, healthy: bool) -> fmt::Result {
    if !healthy {
        writeln!(out, "API status: {status}")?;
    }
    Ok(())
}

pub fn render_psi(psi: &PsiResponse) -> Result<String, fmt::Error> {
    let mut out = String::new();
    status_line(&mut out, &psi.api_info.status, psi.api_info.is_healthy())?;

    let Some(item) = psi.latest() else {
        out.push_str("No PSI readings available.\n");
        return Ok(out);
    };

    writeln!(out, "PSI readings at {}", stamp(&item.timestamp))?;
    write!(out, "{:<10}", "region")?;
    for (_, label) in PSI_COLUMNS {
        write!(out, "{label:>9}")?;
    }
    out.push('\n');

    for region in &psi.region_metadata {
        write!(out, "{:<10}", region.name)?;
        for (measure, _) in PSI_COLUMNS {
            match item.reading(measure, &region.name) {
                Some(value) => write!(out, "{value:>9}")?,
                None => write!(out, "{:>9}", "-")?,
            }
        }
        out.push('\n');
    }

    Ok(out)
}

pub fn render_forecast(
    forecast: &ForecastResponse,
    area_filter: Option<&str>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    status_line(&mut out, &forecast.api_info.status, forecast.api_info.is_healthy())?;

    let Some(item) = forecast.latest() else {
        out.push_str("No forecast available.\n");
        return Ok(out);
    };

    writeln!(
        out,
        "2-hour forecast valid {} to {}",
        stamp(&item.valid_period.start),
        stamp(&item.valid_period.end)
    )?;

    let filter = area_filter.map(str::to_lowercase);
    let width = item.forecasts.iter().map(|f| f.area.len()).max().unwrap_or(0);
    for entry in &item.forecasts {
        if let Some(needle) = &filter {
            if !entry.area.to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }
        writeln!(out, "{:<width$}  {}", entry.area, entry.forecast)?;
    }

    Ok(out)
}

pub fn render_carparks(carparks: &CarparkResponse, only: &[String]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    status_line(&mut out, &carparks.api_info.status, carparks.api_info.is_healthy())?;

    let Some(item) = carparks.latest() else {
        out.push_str("No carpark data available.\n");
        return Ok(out);
    };

    writeln!(out, "Carpark availability at {}", stamp(&item.timestamp))?;
    writeln!(out, "{:<8} {:<4} {:>9} {:>6}  updated", "carpark", "type", "available", "total")?;

    for carpark in &item.carpark_data {
        if !only.is_empty() && !only.iter().any(|n| n.eq_ignore_ascii_case(&carpark.carpark_number)) {
            continue;
        }
        for lot in &carpark.carpark_info {
            writeln!(
                out,
                "{:<8} {:<4} {:>9} {:>6}  {}",
                carpark.carpark_number,
                lot.lot_type,
                lot.lots_available,
                lot.total_lots,
                carpark.update_datetime.format("%Y-%m-%d %H:%M"),
            )?;
        }
    }

    Ok(out)
}
