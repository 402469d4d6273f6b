// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lead commands

use crate::adapters::Pipeline;
use crate::error::FmError;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use fm_core::{
    Activity, ActivityDraft, ActivityType, Lead, LeadDraft, LeadFilter, LeadId, LeadSource,
    SlaBand, Stage,
};
use fm_engine::AuditStatus;
use serde::Serialize;
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args)]
pub struct LeadArgs {
    #[command(subcommand)]
    pub command: LeadCommand,
}

#[derive(Subcommand)]
pub enum LeadCommand {
    /// List leads matching the given criteria
    List(ListArgs),
    /// Show a lead with its SLA band and activities
    Show {
        /// Lead id
        id: i64,
    },
    /// Create a lead from intake details
    Create(CreateArgs),
    /// Move a lead to another stage
    Move {
        /// Lead id
        id: i64,
        /// Target stage (e.g. CONTACTED, WON)
        stage: Stage,
    },
    /// Hand a lead off as a project
    Convert {
        /// Lead id
        id: i64,
    },
    /// Recompute a lead's score
    Rescore {
        /// Lead id
        id: i64,
    },
    /// Log a note, call, email or task
    Log {
        /// Lead id
        id: i64,
        #[arg(long)]
        kind: ActivityType,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Upload a file and attach it to a lead
    Attach {
        /// Lead id
        id: i64,
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Only leads in this stage (repeatable)
    #[arg(long = "stage")]
    stages: Vec<Stage>,
    /// Only leads from this source (repeatable)
    #[arg(long = "source")]
    sources: Vec<LeadSource>,
    #[arg(long)]
    owner: Option<i64>,
    /// Case-insensitive text search over name, company, email, phone and project type
    #[arg(long)]
    search: Option<String>,
    /// Only leads in this SLA band
    #[arg(long)]
    sla: Option<SlaBand>,
}

impl ListArgs {
    fn filter(&self) -> LeadFilter {
        LeadFilter {
            search: self.search.clone(),
            stages: self.stages.clone(),
            sources: self.sources.clone(),
            owner_id: self.owner,
            sla: self.sla,
        }
    }
}

#[derive(Args)]
pub struct CreateArgs {
    /// Contact name
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    project_type: Option<String>,
    /// Project description
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    budget_min: Option<f64>,
    #[arg(long)]
    budget_max: Option<f64>,
    #[arg(long, default_value = "OTHER")]
    source: LeadSource,
    #[arg(long)]
    notes: Option<String>,
    /// Owning user id
    #[arg(long)]
    owner: Option<i64>,
}

impl CreateArgs {
    fn draft(self) -> LeadDraft {
        LeadDraft {
            contact_name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            address: self.address,
            project_type: self.project_type,
            project_description: self.description,
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            lead_source: self.source,
            owner_id: self.owner,
            notes: self.notes,
        }
    }
}

#[derive(Serialize)]
struct LeadRow {
    #[serde(flatten)]
    lead: Lead,
    sla: Option<SlaBand>,
}

#[derive(Serialize)]
struct LeadDetail {
    lead: Lead,
    sla: Option<SlaBand>,
    activities: Vec<Activity>,
}

pub async fn handle(args: LeadArgs, pipeline: &Pipeline, format: OutputFormat) -> Result<()> {
    match args.command {
        LeadCommand::List(args) => list(&args, pipeline, format).await,
        LeadCommand::Show { id } => show(LeadId(id), pipeline, format).await,
        LeadCommand::Create(args) => {
            let lead = pipeline
                .create(&args.draft())
                .await
                .map_err(FmError::from)?;
            output::print(&lead, format, |lead| {
                format!(
                    "Created lead {} for {} (score {}, next action {})",
                    lead.id,
                    lead.contact_name,
                    lead.score,
                    output::timestamp(lead.next_action_at)
                )
            })
        }
        LeadCommand::Move { id, stage } => {
            let outcome = pipeline
                .transition(LeadId(id), stage)
                .await
                .map_err(FmError::from)?;
            if let AuditStatus::Dropped { error } = &outcome.audit {
                eprintln!("warning: status change audit entry was lost: {}", error);
            }
            output::print(&outcome, format, |o| {
                let audit = match &o.audit {
                    AuditStatus::Recorded { activity_id } => format!("activity {}", activity_id),
                    AuditStatus::Deferred { entry_id } => {
                        format!("deferred as {} (run `fm audit flush`)", entry_id)
                    }
                    AuditStatus::Dropped { .. } => "lost".to_string(),
                };
                format!(
                    "Lead {} moved from {} to {}\n  next action: {}\n  audit: {}",
                    o.lead_id,
                    o.from.label(),
                    o.to.label(),
                    output::timestamp(o.next_action_at),
                    audit
                )
            })
        }
        LeadCommand::Convert { id } => {
            let project = pipeline
                .convert(LeadId(id))
                .await
                .map_err(FmError::from)?;
            let value = json!({ "lead_id": id, "project_id": project });
            output::print(&value, format, |_| {
                format!("Lead {} converted to project {}", id, project)
            })
        }
        LeadCommand::Rescore { id } => {
            let score = pipeline
                .rescore(LeadId(id))
                .await
                .map_err(FmError::from)?;
            let value = json!({ "lead_id": id, "score": score });
            output::print(&value, format, |_| format!("Lead {} scored {}", id, score))
        }
        LeadCommand::Log {
            id,
            kind,
            title,
            description,
        } => {
            let mut draft = ActivityDraft::new(kind, title);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            let activity = pipeline
                .log_activity(LeadId(id), &draft)
                .await
                .map_err(FmError::from)?;
            output::print(&activity, format, |a| {
                format!("Logged {} {} on lead {}", a.activity_type, a.id, a.lead_id)
            })
        }
        LeadCommand::Attach { id, file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| format!("{} has no file name", file.display()))?;
            let document = pipeline
                .attach(LeadId(id), &file_name, bytes)
                .await
                .map_err(FmError::from)?;
            output::print(&document, format, |d| {
                format!(
                    "Attached {} ({} bytes) to lead {} as {}",
                    d.file_name, d.size_bytes, d.lead_id, d.file_id
                )
            })
        }
    }
}

async fn list(args: &ListArgs, pipeline: &Pipeline, format: OutputFormat) -> Result<()> {
    let leads = pipeline
        .search(&args.filter())
        .await
        .map_err(FmError::from)?;
    let rows: Vec<LeadRow> = leads
        .into_iter()
        .map(|lead| LeadRow {
            sla: pipeline.sla(&lead),
            lead,
        })
        .collect();

    output::print(&rows, format, |rows| {
        if rows.is_empty() {
            return "No leads".to_string();
        }
        let mut out = format!(
            "{:<7} {:<24} {:<14} {:>5}  {:<16} SLA\n",
            "ID", "CONTACT", "STAGE", "SCORE", "NEXT ACTION"
        );
        for row in rows {
            let _ = writeln!(
                out,
                "{:<7} {:<24} {:<14} {:>5}  {:<16} {}",
                row.lead.id.0,
                output::truncate(&row.lead.contact_name, 24),
                row.lead.status.as_str(),
                row.lead.score,
                output::timestamp(row.lead.next_action_at),
                output::badge(row.sla)
            );
        }
        out
    })
}

async fn show(id: LeadId, pipeline: &Pipeline, format: OutputFormat) -> Result<()> {
    let lead = pipeline.lead(id).await.map_err(FmError::from)?;
    let activities = pipeline.activities(id).await.map_err(FmError::from)?;
    let detail = LeadDetail {
        sla: pipeline.sla(&lead),
        lead,
        activities,
    };

    output::print(&detail, format, |d| {
        let lead = &d.lead;
        let mut out = format!("Lead {}: {}\n", lead.id, lead.contact_name);
        let _ = writeln!(out, "  Stage: {}", lead.status.label());
        let _ = writeln!(out, "  Source: {}", lead.lead_source);
        let _ = writeln!(out, "  Score: {}", lead.score);
        let _ = writeln!(
            out,
            "  Next action: {} {}",
            output::timestamp(lead.next_action_at),
            output::badge(d.sla)
        );
        for (label, value) in [
            ("Company", &lead.company),
            ("Email", &lead.email),
            ("Phone", &lead.phone),
            ("Address", &lead.address),
            ("Project", &lead.project_type),
            ("Notes", &lead.notes),
        ] {
            if let Some(value) = value {
                let _ = writeln!(out, "  {}: {}", label, value);
            }
        }
        if lead.budget_min.is_some() || lead.budget_max.is_some() {
            let _ = writeln!(
                out,
                "  Budget: {} - {}",
                lead.budget_min.map(output::money).unwrap_or_default(),
                lead.budget_max.map(output::money).unwrap_or_default()
            );
        }
        if let Some(project) = lead.converted_project_id {
            let _ = writeln!(out, "  Converted to project {}", project);
        }
        if !d.activities.is_empty() {
            let _ = writeln!(out, "  Activities:");
            for a in &d.activities {
                let _ = writeln!(
                    out,
                    "    {}  {:<13} {}",
                    output::timestamp(Some(a.created_at)),
                    a.activity_type.as_str(),
                    a.title
                );
            }
        }
        out
    })
}
