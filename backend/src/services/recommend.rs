//! Recommendation context building and the external generator seam.
//!
//! The context builder assembles a structured snapshot of the user's plan and
//! recent study patterns; the generator turns it into short recommendation
//! strings. Generator failures never surface to the caller: the response
//! degrades to a fixed default list.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::Config;
use crate::models::focus_session::FocusSession;
use crate::models::study_session::StudySession;
use crate::models::task::Task;
use crate::repositories::{focus_session as focus_repo, study_session as session_repo, task as task_repo};
use crate::services::stats;
use crate::types::{TaskId, UserId};
use crate::utils::time;

const INSTRUCTION_PROMPT: &str = "You are a study coach. Based on the student's upcoming tasks, \
planned sessions and recent focus patterns below, respond with a JSON array of 4 to 5 short, \
specific study recommendations. Respond with the JSON array only.";

const MAX_RECOMMENDATIONS: usize = 5;

/// The generic list served whenever the generator is unavailable or returns
/// something unusable.
const DEFAULT_RECOMMENDATIONS: [&str; 5] = [
    "Consider reviewing past problems for 15 minutes before your next session.",
    "Your current study intensity is high; ensure you take short breaks.",
    "Explore additional resources on difficult topics to deepen understanding.",
    "Utilize flashcards for key terms; spaced repetition is highly effective.",
    "Try active recall techniques to improve retention.",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextTask {
    pub id: TaskId,
    pub title: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub days_until: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOverdueTask {
    pub id: TaskId,
    pub title: String,
    pub due_date: NaiveDate,
    pub days_overdue: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSession {
    pub title: String,
    pub subject: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

impl From<&StudySession> for ContextSession {
    fn from(session: &StudySession) -> Self {
        Self {
            title: session.title.clone(),
            subject: session.subject.clone(),
            date: session.date,
            start_time: time::format_clock(session.start_time),
            end_time: time::format_clock(session.end_time),
        }
    }
}

/// Snapshot handed to the recommendation generator. The builder knows nothing
/// about how recommendations are produced or rendered.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    pub upcoming_tasks: Vec<ContextTask>,
    pub overdue_tasks: Vec<ContextOverdueTask>,
    pub today_sessions: Vec<ContextSession>,
    pub upcoming_sessions: Vec<ContextSession>,
    pub week_subject_minutes: BTreeMap<String, i64>,
    pub week_total_minutes: i64,
    pub week_average_minutes: i64,
    pub completion_rate: i64,
}

/// Pure assembly over already-fetched rows; `build_context` does the I/O.
pub fn assemble_context(
    all_tasks: &[Task],
    due_soon: &[Task],
    overdue: &[Task],
    today_sessions: &[StudySession],
    upcoming_sessions: &[StudySession],
    week_history: &[FocusSession],
    today: NaiveDate,
) -> RecommendationContext {
    let upcoming_tasks = due_soon
        .iter()
        .map(|t| ContextTask {
            id: t.id,
            title: t.title.clone(),
            due_date: t.due_date,
            completed: t.completed,
            days_until: (t.due_date - today).num_days(),
        })
        .collect();

    let overdue_tasks = overdue
        .iter()
        .map(|t| ContextOverdueTask {
            id: t.id,
            title: t.title.clone(),
            due_date: t.due_date,
            days_overdue: (today - t.due_date).num_days(),
        })
        .collect();

    let week_total_minutes: i64 = week_history.iter().map(|r| r.duration as i64).sum();
    let week_average_minutes = if week_history.is_empty() {
        0
    } else {
        week_total_minutes / week_history.len() as i64
    };

    let completed = all_tasks.iter().filter(|t| t.completed).count();

    RecommendationContext {
        upcoming_tasks,
        overdue_tasks,
        today_sessions: today_sessions.iter().map(ContextSession::from).collect(),
        upcoming_sessions: upcoming_sessions.iter().map(ContextSession::from).collect(),
        week_subject_minutes: stats::subject_minutes(week_history),
        week_total_minutes,
        week_average_minutes,
        completion_rate: stats::completion_rate(completed, all_tasks.len()),
    }
}

pub async fn build_context(
    pool: &PgPool,
    user_id: UserId,
    today: NaiveDate,
) -> Result<RecommendationContext, sqlx::Error> {
    let all_tasks = task_repo::list_tasks(pool, user_id).await?;
    let due_soon =
        task_repo::list_due_between(pool, user_id, today, today + Duration::days(7)).await?;
    let overdue = task_repo::list_overdue(pool, user_id, today).await?;
    let today_sessions = session_repo::list_for_date(pool, user_id, today).await?;
    let upcoming_sessions = session_repo::list_between(
        pool,
        user_id,
        today + Duration::days(1),
        today + Duration::days(3),
    )
    .await?;
    let week_history =
        focus_repo::list_history_between(pool, user_id, today - Duration::days(6), today).await?;

    Ok(assemble_context(
        &all_tasks,
        &due_soon,
        &overdue,
        &today_sessions,
        &upcoming_sessions,
        &week_history,
        today,
    ))
}

#[async_trait]
pub trait RecommendationGenerator: Send + Sync {
    async fn generate(&self, context: &RecommendationContext) -> anyhow::Result<Vec<String>>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions client.
pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsGenerator {
    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.ai_api_key.clone()?;
        Some(Self {
            client: reqwest::Client::new(),
            base_url: config.ai_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.ai_model.clone(),
        })
    }
}

#[async_trait]
impl RecommendationGenerator for ChatCompletionsGenerator {
    async fn generate(&self, context: &RecommendationContext) -> anyhow::Result<Vec<String>> {
        let context_json = serde_json::to_string_pretty(context)?;
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: INSTRUCTION_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: context_json,
                },
            ],
            temperature: 0.4,
            max_tokens: 400,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            anyhow::bail!("recommendation API error {}: {}", status, body);
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("recommendation API returned empty content"))?;

        let recommendations = parse_recommendations(&content);
        if recommendations.is_empty() {
            anyhow::bail!("recommendation API returned no usable recommendations");
        }
        Ok(recommendations)
    }
}

/// Parses generator output: a JSON array of strings (possibly fenced), or
/// free text split into lines as a fallback.
pub fn parse_recommendations(content: &str) -> Vec<String> {
    let clean = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if let Ok(items) = serde_json::from_str::<Vec<String>>(clean) {
        return items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .take(MAX_RECOMMENDATIONS)
            .collect();
    }

    clean
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

pub fn default_recommendations() -> Vec<String> {
    DEFAULT_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
}

/// Response envelope: `success: false` carries the failure reason alongside
/// the fallback list, so recommendations never block the rest of the page.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecommendationsResponse {
    pub fn from_result(result: anyhow::Result<Vec<String>>) -> Self {
        match result {
            Ok(recommendations) => Self {
                success: true,
                recommendations,
                error: None,
            },
            Err(err) => {
                tracing::warn!("recommendation generator failed: {:#}", err);
                Self {
                    success: false,
                    recommendations: default_recommendations(),
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use chrono::NaiveTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, day).unwrap()
    }

    fn task(id: i64, day: u32, completed: bool) -> Task {
        Task {
            id: TaskId(id),
            user_id: UserId(1),
            title: format!("task {id}"),
            due_date: d(day),
            completed,
            created_at: d(1).and_hms_opt(0, 0, 0).unwrap(),
            updated_at: d(1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn session(day: u32, title: &str, hour: u32) -> StudySession {
        StudySession {
            id: crate::types::StudySessionId(0),
            user_id: UserId(1),
            title: title.to_string(),
            subject: title.to_string(),
            date: d(day),
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
            color: "blue".to_string(),
            priority: "medium".to_string(),
            notes: String::new(),
            created_at: d(1).and_hms_opt(0, 0, 0).unwrap(),
            updated_at: d(1).and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    fn focus(day: u32, subject: &str, duration: i32) -> FocusSession {
        FocusSession {
            id: crate::types::FocusSessionId(0),
            user_id: UserId(1),
            subject: subject.to_string(),
            date: d(day),
            start_time: d(day).and_hms_opt(9, 0, 0).unwrap(),
            end_time: Some(d(day).and_hms_opt(10, 0, 0).unwrap()),
            duration,
            created_at: d(day).and_hms_opt(10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn assemble_context_computes_relative_days() {
        let today = d(26);
        let all = vec![task(1, 26, true), task(2, 28, false), task(3, 24, false)];
        let due_soon = vec![all[0].clone(), all[1].clone()];
        let overdue = vec![all[2].clone()];
        let week = vec![focus(25, "Math", 30), focus(26, "Math", 60)];

        let ctx = assemble_context(
            &all,
            &due_soon,
            &overdue,
            &[session(26, "Calculus II", 9)],
            &[session(27, "Physics", 14)],
            &week,
            today,
        );

        assert_eq!(ctx.upcoming_tasks[0].days_until, 0);
        assert_eq!(ctx.upcoming_tasks[1].days_until, 2);
        assert_eq!(ctx.overdue_tasks[0].days_overdue, 2);
        assert_eq!(ctx.week_total_minutes, 90);
        assert_eq!(ctx.week_average_minutes, 45);
        assert_eq!(ctx.week_subject_minutes.get("Math"), Some(&90));
        assert_eq!(ctx.completion_rate, 33);
        assert_eq!(ctx.today_sessions.len(), 1);
        assert_eq!(ctx.today_sessions[0].start_time, "09:00");
    }

    #[test]
    fn parse_recommendations_accepts_json_array() {
        let parsed = parse_recommendations(r#"["Review notes", "Take breaks"]"#);
        assert_eq!(parsed, vec!["Review notes", "Take breaks"]);
    }

    #[test]
    fn parse_recommendations_strips_code_fences() {
        let parsed = parse_recommendations("```json\n[\"One\", \"Two\"]\n```");
        assert_eq!(parsed, vec!["One", "Two"]);
    }

    #[test]
    fn parse_recommendations_falls_back_to_lines() {
        let parsed = parse_recommendations("- Review calculus\n2. Take a break\n\n* Sleep well");
        assert_eq!(parsed, vec!["Review calculus", "Take a break", "Sleep well"]);
    }

    #[test]
    fn parse_recommendations_caps_at_five() {
        let parsed = parse_recommendations("a\nb\nc\nd\ne\nf\ng");
        assert_eq!(parsed.len(), 5);
    }

    #[test]
    fn parse_recommendations_empty_input_yields_nothing() {
        assert!(parse_recommendations("").is_empty());
        assert!(parse_recommendations("```\n```").is_empty());
    }

    #[test]
    fn failure_degrades_to_default_list() {
        let response =
            RecommendationsResponse::from_result(Err(anyhow::anyhow!("quota exceeded")));
        assert!(!response.success);
        assert_eq!(response.recommendations.len(), 5);
        assert_eq!(response.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn success_passes_generated_list_through() {
        let response =
            RecommendationsResponse::from_result(Ok(vec!["Review notes".to_string()]));
        assert!(response.success);
        assert_eq!(response.recommendations, vec!["Review notes"]);
        assert!(response.error.is_none());
    }
}
