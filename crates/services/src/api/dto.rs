//! Wire shapes of the quiz service and their conversion into domain types.
//!
//! Field names follow the service verbatim (including its inconsistent casing),
//! so every struct here stays private to the crate's API layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quiz_core::model::{
    ChoiceSet, LeaderboardEntry, LeaderboardPage, QuizError, QuizId, QuizItem, QuizResult,
    RankTier, SignupForm, Subject, UserId, UserInfo, UserStats,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

//
// ─── ENVELOPE ──────────────────────────────────────────────────────────────────
//

/// `{ success, data, message }` wrapper used by the user endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

//
// ─── AUTH & SIGNUP ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequestDto<'a> {
    pub id: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignupRequestDto<'a> {
    pub id: &'a str,
    pub password: &'a str,
    pub nickname: &'a str,
    pub name: &'a str,
    pub gender: &'a str,
    pub age: u32,
    /// Assigned by the service; always sent empty.
    pub user_rank: &'static str,
}

impl<'a> From<&'a SignupForm> for SignupRequestDto<'a> {
    fn from(form: &'a SignupForm) -> Self {
        Self {
            id: form.id(),
            password: form.password(),
            nickname: form.nickname(),
            name: form.name(),
            gender: form.gender(),
            age: form.age(),
            user_rank: "",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SurveyResponseDto {
    #[serde(default)]
    pub success: bool,
    pub user_id: Option<Value>,
    pub message: Option<String>,
}

impl SurveyResponseDto {
    /// A returned user id counts as acceptance even without `success`.
    pub fn accepted(&self) -> bool {
        let has_user_id = self
            .user_id
            .as_ref()
            .is_some_and(|id| !id.is_null() && id != &Value::Bool(false) && id != "");
        has_user_id || self.success
    }
}

//
// ─── QUIZ CATALOG ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BinaryOptionDto {
    pub choice_a: String,
    pub choice_b: String,
    #[serde(default)]
    pub correct_ans: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuaternaryOptionDto {
    pub choice_a: String,
    pub choice_b: String,
    pub choice_c: String,
    pub choice_d: String,
    #[serde(default)]
    pub correct_ans: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizItemDto {
    pub quiz_id: u64,
    pub quiz_content: String,
    pub quiz_subject: String,
    pub quiz_rank: String,
    pub quiz_level: i32,
    pub option2: Option<BinaryOptionDto>,
    pub option4: Option<QuaternaryOptionDto>,
}

/// Why a catalog entry could not become a `QuizItem`.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ItemConversionError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("unknown quiz rank {0:?}")]
    Rank(String),
}

impl TryFrom<QuizItemDto> for QuizItem {
    type Error = ItemConversionError;

    fn try_from(dto: QuizItemDto) -> Result<Self, Self::Error> {
        let rank: RankTier = dto
            .quiz_rank
            .parse()
            .map_err(|_| ItemConversionError::Rank(dto.quiz_rank.clone()))?;
        let subject = Subject::new(&dto.quiz_subject)?;
        let binary = dto
            .option2
            .map(|o| ([o.choice_a, o.choice_b], o.correct_ans));
        let quaternary = dto.option4.map(|o| {
            (
                [o.choice_a, o.choice_b, o.choice_c, o.choice_d],
                o.correct_ans,
            )
        });
        let choices = ChoiceSet::from_shapes(binary, quaternary)?;

        Ok(QuizItem::new(
            QuizId::new(dto.quiz_id),
            dto.quiz_content,
            subject,
            rank,
            dto.quiz_level,
            choices,
        )?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerdictDto {
    pub is_correct: bool,
    #[serde(default)]
    pub message: String,
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryQuizDto {
    pub quiz_id: u64,
    #[serde(default)]
    pub quizcontent: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub quiz_level: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizResultDto {
    #[serde(default)]
    pub quiz_result_id: u64,
    pub is_correct: bool,
    pub quiz_date: Option<String>,
    pub quiz_id: HistoryQuizDto,
}

impl From<QuizResultDto> for QuizResult {
    fn from(dto: QuizResultDto) -> Self {
        QuizResult {
            result_id: dto.quiz_result_id,
            quiz_id: QuizId::new(dto.quiz_id.quiz_id),
            is_correct: dto.is_correct,
            taken_at: dto.quiz_date.as_deref().and_then(parse_quiz_date),
            prompt: dto.quiz_id.quizcontent,
            subject: dto.quiz_id.subject,
            level: dto.quiz_id.quiz_level,
        }
    }
}

/// Accepts RFC 3339, a zone-less `LocalDateTime`, or a bare date (read as UTC).
pub(crate) fn parse_quiz_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

//
// ─── PROFILE ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct UserInfoDto {
    #[serde(default)]
    pub userrank: Option<String>,
    pub nickname: Option<String>,
    pub name: Option<String>,
}

impl From<UserInfoDto> for UserInfo {
    fn from(dto: UserInfoDto) -> Self {
        UserInfo {
            nickname: dto.nickname,
            name: dto.name,
            rank: dto
                .userrank
                .as_deref()
                .map(RankTier::from_wire_lenient)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatsDto {
    #[serde(default)]
    pub stats_id: u64,
    #[serde(default)]
    pub invest_stat: i64,
    #[serde(default)]
    pub credit_stat: i64,
    #[serde(default)]
    pub fi_stat: i64,
    #[serde(default)]
    pub stat_sum: i64,
    pub weebee_image_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserStatsDto {
    pub stats: StatsDto,
    pub user_rank: Option<String>,
}

impl From<UserStatsDto> for UserStats {
    fn from(dto: UserStatsDto) -> Self {
        let stats = dto.stats;
        UserStats {
            stats_id: stats.stats_id,
            invest: stats.invest_stat,
            credit: stats.credit_stat,
            finance: stats.fi_stat,
            stat_sum: stats.stat_sum,
            character_image: stats.weebee_image_name.filter(|name| !name.trim().is_empty()),
            rank: dto
                .user_rank
                .as_deref()
                .map(RankTier::from_wire_lenient)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CharacterImageDto {
    pub image_name: Option<String>,
}

//
// ─── LEADERBOARD ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeaderboardRowDto {
    pub user_id: u64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub stat_sum: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageDto<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl From<PageDto<LeaderboardRowDto>> for LeaderboardPage {
    fn from(dto: PageDto<LeaderboardRowDto>) -> Self {
        LeaderboardPage {
            entries: dto
                .content
                .into_iter()
                .map(|row| LeaderboardEntry {
                    user_id: UserId::new(row.user_id),
                    nickname: row.nickname,
                    stat_sum: row.stat_sum,
                })
                .collect(),
            page: dto.number,
            size: dto.size,
            total_pages: dto.total_pages,
            total_elements: dto.total_elements,
            first: dto.first,
            last: dto.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn item_json(option2: Value, option4: Value) -> Value {
        json!({
            "quizId": 11,
            "quizContent": "What does APR stand for?",
            "quizSubject": "finance",
            "quizRank": "SILVER",
            "quizLevel": 2,
            "option2": option2,
            "option4": option4,
            "correctAns": "1"
        })
    }

    #[test]
    fn quaternary_item_converts() {
        let dto: QuizItemDto = serde_json::from_value(item_json(
            Value::Null,
            json!({"quizId": 11, "choiceA": "a", "choiceB": "b", "choiceC": "c", "choiceD": "d", "correctAns": "3"}),
        ))
        .unwrap();
        let item = QuizItem::try_from(dto).unwrap();
        assert_eq!(item.id(), QuizId::new(11));
        assert_eq!(item.required_rank(), RankTier::Silver);
        assert_eq!(item.level(), 2);
        assert_eq!(item.choices().len(), 4);
        assert_eq!(item.choices().correct(), "3");
    }

    #[test]
    fn item_with_both_shapes_is_rejected() {
        let dto: QuizItemDto = serde_json::from_value(item_json(
            json!({"choiceA": "yes", "choiceB": "no", "correctAns": "1"}),
            json!({"choiceA": "a", "choiceB": "b", "choiceC": "c", "choiceD": "d"}),
        ))
        .unwrap();
        let err = QuizItem::try_from(dto).unwrap_err();
        assert!(matches!(
            err,
            ItemConversionError::Quiz(QuizError::ChoiceShape { .. })
        ));
    }

    #[test]
    fn item_with_unknown_rank_is_rejected() {
        let mut raw = item_json(json!({"choiceA": "yes", "choiceB": "no"}), Value::Null);
        raw["quizRank"] = json!("PLATINUM");
        let dto: QuizItemDto = serde_json::from_value(raw).unwrap();
        assert!(matches!(
            QuizItem::try_from(dto),
            Err(ItemConversionError::Rank(_))
        ));
    }

    #[test]
    fn quiz_dates_in_several_formats() {
        let rfc = parse_quiz_date("2024-03-01T09:30:00+09:00").unwrap();
        assert_eq!(rfc.hour(), 0);
        let local = parse_quiz_date("2024-03-01T09:30:00.123").unwrap();
        assert_eq!(local.minute(), 30);
        let day = parse_quiz_date("2024-03-01").unwrap();
        assert_eq!(day.day(), 1);
        assert!(parse_quiz_date("yesterday").is_none());
    }

    #[test]
    fn survey_acceptance_rules() {
        let by_id: SurveyResponseDto = serde_json::from_value(json!({"userId": 42})).unwrap();
        assert!(by_id.accepted());
        let by_flag: SurveyResponseDto = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(by_flag.accepted());
        let refused: SurveyResponseDto =
            serde_json::from_value(json!({"success": false, "message": "dup"})).unwrap();
        assert!(!refused.accepted());
    }

    #[test]
    fn signup_request_sends_blank_rank() {
        let form = SignupForm::new("alice", "pw", "Al", "Alice", "F", 30).unwrap();
        let json = serde_json::to_value(SignupRequestDto::from(&form)).unwrap();
        assert_eq!(json["userRank"], json!(""));
        assert_eq!(json["age"], json!(30));
    }
}
