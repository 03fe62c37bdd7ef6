//! Rendering command results as plain text or JSON.

use crate::error::PortalAppError;

use common::ErrorLocation;
use models::{DashboardCounters, PortalUser, PosSession, Product, StockLocation, Transfer};

use std::fmt::Write;
use std::panic::Location;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Something a command can print.
pub trait Render: Serialize {
    fn render_text(&self) -> String;
}

pub fn render<T: Render + ?Sized>(value: &T, format: OutputFormat) -> Result<String, PortalAppError> {
    match format {
        OutputFormat::Text => Ok(value.render_text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| PortalAppError::Portal {
                message: format!("Failed to serialize output: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

impl Render for PortalUser {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} <{}>", self.name, self.login);
        let _ = writeln!(out, "  user id:  {}", self.id);
        let _ = writeln!(out, "  role:     {:?}", self.role);
        let _ = writeln!(out, "  company:  {} ({})", self.company_name, self.company_id);
        if let Some(partner) = self.partner_id {
            let _ = writeln!(out, "  partner:  {partner}");
        }
        out
    }
}

impl Render for [Product] {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return String::from("No products.\n");
        }
        let mut out = String::new();
        for p in self {
            let _ = writeln!(
                out,
                "{:>6}  {:<12} {:<40} {:>10.2} {:>10.2}",
                p.id,
                p.default_code.as_deref().unwrap_or("-"),
                p.name,
                p.qty_available,
                p.list_price
            );
        }
        out
    }
}

impl Render for [StockLocation] {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return String::from("No locations.\n");
        }
        let mut out = String::new();
        for loc in self {
            let _ = writeln!(
                out,
                "{:>6}  {:<30} {}",
                loc.id,
                loc.display_path(),
                loc.pos_names.join(", ")
            );
        }
        out
    }
}

impl Render for [Transfer] {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return String::from("No transfer requests.\n");
        }
        let name = |m: &Option<models::Many2One>| {
            m.as_ref().map(|m| m.name.clone()).unwrap_or_else(|| String::from("---"))
        };
        let mut out = String::new();
        for t in self {
            let _ = writeln!(
                out,
                "{:<16} {:<10} {} -> {}  {}",
                t.name,
                t.state.as_str(),
                name(&t.source),
                name(&t.destination),
                t.scheduled_date.as_deref().unwrap_or("")
            );
        }
        out
    }
}

impl Render for [PosSession] {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return String::from("No POS sessions.\n");
        }
        let mut out = String::new();
        for s in self {
            let _ = writeln!(
                out,
                "{:<16} {:<16} {:<24} {}",
                s.name,
                s.state.as_str(),
                s.user.as_ref().map(|u| u.name.as_str()).unwrap_or("-"),
                s.start_at.as_deref().unwrap_or("")
            );
        }
        out
    }
}

impl Render for DashboardCounters {
    fn render_text(&self) -> String {
        format!(
            "Pending pickings:        {}\nMain warehouse internal: {}\nBranch B1 inbound:       {}\n",
            self.pending_total, self.main_internal, self.branch_inbound
        )
    }
}

/// Id of a newly created transfer request.
#[derive(Debug, Serialize)]
pub struct Submitted {
    pub picking_id: i64,
}

impl Render for Submitted {
    fn render_text(&self) -> String {
        format!("Transfer request created: picking {}\n", self.picking_id)
    }
}
