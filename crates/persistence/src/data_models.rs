// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and row-to-domain conversions.
//!
//! Monetary amounts and hours are stored as TEXT and carried as
//! `rust_decimal::Decimal` in the domain; this module owns the parsing
//! in both directions.

use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_event_audit::{Actor, HistoryEntry, SideEffect};
use shop_event_domain::{
    ApprovalPacket, CarNumber, Cancellation, DecisionSource, EstimateLine, EstimateSubmission,
    EventNumber, EventState, LineDecision, OverallDecision, ShopCode, ShoppingEvent,
    SubmissionStatus,
};
use std::str::FromStr;

use crate::diesel_schema::{
    approval_packets, estimate_lines, estimate_submissions, line_decisions, shopping_events,
    state_history,
};
use crate::error::PersistenceError;

/// Serializable representation of a ledger side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideEffectData {
    pub kind: String,
    pub detail: String,
}

/// Parses a stored TEXT decimal.
pub fn parse_decimal(field: &str, value: &str) -> Result<Decimal, PersistenceError> {
    Decimal::from_str(value).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid decimal in {field}: {value}: {e}"))
    })
}

/// Parses a stored state string.
pub fn parse_state(value: &str) -> Result<EventState, PersistenceError> {
    EventState::from_str(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shopping_events)]
pub struct ShoppingEventRow {
    pub event_id: i64,
    pub event_number: String,
    pub car_number: String,
    pub shop_code: String,
    pub type_code: String,
    pub reason_code: Option<String>,
    pub state: String,
    pub version: i64,
    pub created_by: String,
    pub created_at: String,
    pub cancelled_at: Option<String>,
    pub cancelled_by: Option<String>,
    pub cancellation_reason: Option<String>,
}

impl ShoppingEventRow {
    /// Reconstructs the domain event from its row.
    pub fn into_domain(self) -> Result<ShoppingEvent, PersistenceError> {
        let state: EventState = parse_state(&self.state)?;
        let cancellation: Option<Cancellation> =
            match (self.cancelled_at, self.cancelled_by, self.cancellation_reason) {
                (Some(cancelled_at), Some(cancelled_by), Some(reason)) => Some(Cancellation {
                    cancelled_at,
                    cancelled_by,
                    reason,
                }),
                (None, None, None) => None,
                _ => {
                    return Err(PersistenceError::ReconstructionError(format!(
                        "Partial cancellation metadata on event {}",
                        self.event_id
                    )));
                }
            };

        Ok(ShoppingEvent {
            event_id: self.event_id,
            event_number: EventNumber::new(&self.event_number),
            car_number: CarNumber::new(&self.car_number),
            shop_code: ShopCode::new(&self.shop_code),
            type_code: self.type_code,
            reason_code: self.reason_code,
            state,
            version: self.version,
            created_by: self.created_by,
            created_at: self.created_at,
            cancellation,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = shopping_events)]
pub struct NewShoppingEventRow {
    pub event_number: String,
    pub car_number: String,
    pub shop_code: String,
    pub type_code: String,
    pub reason_code: Option<String>,
    pub state: String,
    pub version: i64,
    pub created_by: String,
    pub created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = estimate_submissions)]
pub struct SubmissionRow {
    pub submission_id: i64,
    pub event_id: i64,
    pub version: i32,
    pub status: String,
    pub is_final: i32,
    pub labor_hours_total: String,
    pub material_cost_total: String,
    pub total_cost: String,
    pub submitted_by: String,
    pub submitted_at: String,
}

impl SubmissionRow {
    /// Reconstructs the domain submission, attaching its lines.
    pub fn into_domain(
        self,
        lines: Vec<EstimateLine>,
    ) -> Result<EstimateSubmission, PersistenceError> {
        let status: SubmissionStatus = SubmissionStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

        Ok(EstimateSubmission {
            submission_id: self.submission_id,
            event_id: self.event_id,
            version: self.version,
            status,
            is_final: self.is_final != 0,
            labor_hours_total: parse_decimal("labor_hours_total", &self.labor_hours_total)?,
            material_cost_total: parse_decimal("material_cost_total", &self.material_cost_total)?,
            total_cost: parse_decimal("total_cost", &self.total_cost)?,
            submitted_by: self.submitted_by,
            submitted_at: self.submitted_at,
            lines,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = estimate_submissions)]
pub struct NewSubmissionRow {
    pub event_id: i64,
    pub version: i32,
    pub status: String,
    pub is_final: i32,
    pub labor_hours_total: String,
    pub material_cost_total: String,
    pub total_cost: String,
    pub submitted_by: String,
    pub submitted_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = estimate_lines)]
pub struct LineRow {
    pub line_id: i64,
    #[allow(dead_code)]
    pub submission_id: i64,
    pub line_number: i32,
    pub task_code: String,
    pub description: String,
    pub labor_hours: String,
    pub material_cost: String,
    pub total_cost: String,
}

impl LineRow {
    pub fn into_domain(self) -> Result<EstimateLine, PersistenceError> {
        Ok(EstimateLine {
            line_id: self.line_id,
            line_number: self.line_number,
            task_code: self.task_code,
            description: self.description,
            labor_hours: parse_decimal("labor_hours", &self.labor_hours)?,
            material_cost: parse_decimal("material_cost", &self.material_cost)?,
            total_cost: parse_decimal("total_cost", &self.total_cost)?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = estimate_lines)]
pub struct NewLineRow {
    pub submission_id: i64,
    pub line_number: i32,
    pub task_code: String,
    pub description: String,
    pub labor_hours: String,
    pub material_cost: String,
    pub total_cost: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = line_decisions)]
pub struct DecisionRow {
    pub decision_id: i64,
    pub line_id: i64,
    pub source: String,
    pub confidence: Option<String>,
    pub verdict: String,
    pub responsibility: String,
    pub basis_type: String,
    pub basis_reference: String,
    pub notes: Option<String>,
    pub decided_by: String,
    pub decided_at: String,
}

impl DecisionRow {
    pub fn into_domain(self) -> Result<LineDecision, PersistenceError> {
        let confidence: Option<Decimal> = self
            .confidence
            .as_deref()
            .map(|value| parse_decimal("confidence", value))
            .transpose()?;
        let source: DecisionSource = DecisionSource::from_parts(&self.source, confidence)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

        Ok(LineDecision {
            decision_id: self.decision_id,
            line_id: self.line_id,
            source,
            verdict: self
                .verdict
                .parse()
                .map_err(|e: shop_event_domain::DomainError| {
                    PersistenceError::ReconstructionError(e.to_string())
                })?,
            responsibility: self.responsibility.parse().map_err(
                |e: shop_event_domain::DomainError| {
                    PersistenceError::ReconstructionError(e.to_string())
                },
            )?,
            basis_type: self.basis_type,
            basis_reference: self.basis_reference,
            notes: self.notes,
            decided_by: self.decided_by,
            decided_at: self.decided_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = line_decisions)]
pub struct NewDecisionRow {
    pub line_id: i64,
    pub source: String,
    pub confidence: Option<String>,
    pub verdict: String,
    pub responsibility: String,
    pub basis_type: String,
    pub basis_reference: String,
    pub notes: Option<String>,
    pub decided_by: String,
    pub decided_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = approval_packets)]
pub struct PacketRow {
    pub packet_id: i64,
    pub submission_id: i64,
    pub decision: String,
    pub approved_line_ids_json: String,
    pub notes: Option<String>,
    pub decided_by: String,
    pub decided_at: String,
}

impl PacketRow {
    pub fn into_domain(self) -> Result<ApprovalPacket, PersistenceError> {
        let decision: OverallDecision = OverallDecision::from_str(&self.decision)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        let approved_line_ids: Vec<i64> = serde_json::from_str(&self.approved_line_ids_json)?;

        Ok(ApprovalPacket {
            packet_id: self.packet_id,
            submission_id: self.submission_id,
            decision,
            approved_line_ids,
            notes: self.notes,
            decided_by: self.decided_by,
            decided_at: self.decided_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = approval_packets)]
pub struct NewPacketRow {
    pub submission_id: i64,
    pub decision: String,
    pub approved_line_ids_json: String,
    pub notes: Option<String>,
    pub decided_by: String,
    pub decided_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = state_history)]
pub struct HistoryRow {
    #[allow(dead_code)]
    pub history_id: i64,
    #[allow(dead_code)]
    pub event_id: i64,
    pub from_state: Option<String>,
    pub to_state: String,
    pub actor_id: String,
    pub actor_display_name: String,
    pub occurred_at: String,
    pub notes: Option<String>,
    pub side_effects_json: String,
}

impl HistoryRow {
    pub fn into_domain(self) -> Result<HistoryEntry, PersistenceError> {
        let from_state: Option<EventState> = self
            .from_state
            .as_deref()
            .map(parse_state)
            .transpose()?;
        let to_state: EventState = parse_state(&self.to_state)?;
        let side_effect_data: Vec<SideEffectData> = serde_json::from_str(&self.side_effects_json)?;
        let side_effects: Vec<SideEffect> = side_effect_data
            .into_iter()
            .map(|data| SideEffect::new(data.kind, data.detail))
            .collect();

        Ok(HistoryEntry::new(
            from_state,
            to_state,
            Actor::new(self.actor_id, self.actor_display_name),
            self.occurred_at,
            self.notes,
            side_effects,
        ))
    }
}

#[derive(Insertable)]
#[diesel(table_name = state_history)]
pub struct NewHistoryRow {
    pub event_id: i64,
    pub from_state: Option<String>,
    pub to_state: String,
    pub actor_id: String,
    pub actor_display_name: String,
    pub occurred_at: String,
    pub notes: Option<String>,
    pub side_effects_json: String,
}

impl NewHistoryRow {
    /// Builds an insertable history row from a ledger entry.
    pub fn from_entry(event_id: i64, entry: &HistoryEntry) -> Result<Self, PersistenceError> {
        let side_effect_data: Vec<SideEffectData> = entry
            .side_effects
            .iter()
            .map(|effect| SideEffectData {
                kind: effect.kind.clone(),
                detail: effect.detail.clone(),
            })
            .collect();

        Ok(Self {
            event_id,
            from_state: entry.from_state.map(|state| state.as_str().to_string()),
            to_state: entry.to_state.as_str().to_string(),
            actor_id: entry.actor.id.clone(),
            actor_display_name: entry.actor.display_name.clone(),
            occurred_at: entry.occurred_at.clone(),
            notes: entry.notes.clone(),
            side_effects_json: serde_json::to_string(&side_effect_data)?,
        })
    }
}
