use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::models::{CareerAdvice, ExtractedResume, LearningPath, RecommendedRole, SkillToDevelop};

/// Model names tried in order when generating content
pub const DEFAULT_MODELS: [&str; 5] = [
    "gemini-2.0-flash",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];

/// Errors that can occur when talking to the Gemini API
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Gemini response contained no text content")]
    EmptyContent,

    #[error("Failed to parse model output: {0}")]
    ParseError(String),

    #[error("AI service is not configured")]
    NotConfigured,

    #[error("{0}")]
    AllModelsFailed(AttemptChain),
}

/// One failed generation attempt in the model fallback chain
#[derive(Debug, Clone)]
pub struct ModelAttempt {
    pub model: String,
    pub error: String,
}

/// Full history of failed attempts, kept so the caller can report
/// which models were tried and why the last one failed
#[derive(Debug, Clone, Default)]
pub struct AttemptChain(Vec<ModelAttempt>);

impl AttemptChain {
    fn record(&mut self, model: &str, error: &GeminiError) {
        self.0.push(ModelAttempt {
            model: model.to_string(),
            error: error.to_string(),
        });
    }

    pub fn attempts(&self) -> &[ModelAttempt] {
        &self.0
    }

    pub fn last_error(&self) -> &str {
        self.0
            .last()
            .map(|attempt| attempt.error.as_str())
            .unwrap_or("Unknown error")
    }
}

impl fmt::Display for AttemptChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tried: Vec<&str> = self.0.iter().map(|a| a.model.as_str()).collect();
        write!(
            f,
            "All Gemini models failed. Tried: {}. Last error: {}. \
             Please check your API key and ensure it has access to Gemini models.",
            tried.join(", "),
            self.last_error()
        )
    }
}

/// Gemini REST API client
///
/// Generates structured career advice and parses resume text. All calls
/// go through a model fallback chain: newer flash models first, older
/// ones only when the preferred models reject the request.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    models: Vec<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
    }
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// An empty model list falls back to [`DEFAULT_MODELS`]. A missing or
    /// empty API key produces an unconfigured client; callers check
    /// [`is_configured`](Self::is_configured) or handle
    /// [`GeminiError::NotConfigured`].
    pub fn new(api_key: Option<String>, endpoint: String, models: Vec<String>) -> Self {
        // Generation can take a while on long prompts
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        let models = if models.is_empty() {
            DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
        } else {
            models
        };

        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            endpoint,
            models,
        }
    }

    /// Whether an API key is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, GeminiError> {
        self.api_key.as_deref().ok_or(GeminiError::NotConfigured)
    }

    /// Generate text, trying each configured model in order
    ///
    /// The first successful generation wins. Every failure is recorded in
    /// an [`AttemptChain`] so the terminal error reports the whole history.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let api_key = self.api_key()?;
        let mut chain = AttemptChain::default();

        for model in &self.models {
            match self.generate_with_model(api_key, model, prompt).await {
                Ok(text) => {
                    tracing::debug!("Generated content with model {}", model);
                    return Ok(text);
                }
                Err(err) => {
                    tracing::warn!("Model {} failed: {}", model, err);
                    chain.record(model, &err);
                }
            }
        }

        Err(GeminiError::AllModelsFailed(chain))
    }

    async fn generate_with_model(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            model,
            api_key
        );

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateResponse = response.json().await?;
        payload.first_text().ok_or(GeminiError::EmptyContent)
    }

    /// Extract structured profile data from raw resume text
    ///
    /// Errors (unconfigured, every model failed, unparseable output) are
    /// returned to the caller, which degrades to the deterministic
    /// extractor instead of failing the upload.
    pub async fn extract_resume(&self, resume_text: &str) -> Result<ExtractedResume, GeminiError> {
        let prompt = resume_prompt(resume_text);
        let text = self.generate(&prompt).await?;
        let extracted: ExtractedResume = parse_json_payload(&text)?;
        Ok(extracted.normalize())
    }

    /// Generate structured career advice for a free-form profile
    ///
    /// Output that is not valid JSON is replaced with a fixed structure
    /// carrying the raw text, so a successful generation never errors.
    pub async fn career_advice(
        &self,
        skills: &str,
        experience: &str,
        goals: &str,
    ) -> Result<CareerAdvice, GeminiError> {
        let prompt = advice_prompt(skills, experience, goals);
        let text = self.generate(&prompt).await?;

        let advice = match parse_json_payload::<CareerAdvice>(&text) {
            Ok(advice) => advice,
            Err(err) => {
                tracing::warn!("Advice output was not valid JSON, using fallback: {}", err);
                fallback_advice(&text)
            }
        };

        Ok(advice.normalize())
    }
}

/// JSON shape the advisor prompt asks the model to produce
const ADVICE_SCHEMA: &str = r#"{
  "advice": "A detailed paragraph (3-4 sentences) with personalized career advice based on the user's profile",
  "recommendedRoles": [
    {
      "title": "Job Title",
      "description": "Brief description of why this role fits",
      "matchScore": "High/Medium/Low"
    }
  ],
  "skillsToDevelop": [
    {
      "skill": "Skill Name",
      "priority": "High/Medium/Low",
      "reason": "Why this skill is important"
    }
  ],
  "learningPaths": [
    {
      "path": "Learning path name",
      "resources": ["Resource 1", "Resource 2"],
      "timeline": "Estimated timeline"
    }
  ]
}"#;

/// JSON shape the resume prompt asks the model to produce
const RESUME_SCHEMA: &str = r#"{
  "skills": ["JavaScript", "React", "Node.js", "Python", "MongoDB"],
  "experience": "3 years of full-stack development experience working with React, Node.js, and MongoDB. Led multiple projects and collaborated with cross-functional teams.",
  "projects": ["E-commerce platform built with React and Node.js", "Real-time chat application using WebSockets", "RESTful API for mobile app"],
  "education": ["Bachelor of Science in Computer Science", "Master of Science in Software Engineering"],
  "summary": "Experienced software developer with expertise in modern web technologies"
}"#;

/// Resume text beyond this many characters is not sent to the model
const RESUME_PROMPT_CHAR_LIMIT: usize = 8000;

fn advice_prompt(skills: &str, experience: &str, goals: &str) -> String {
    format!(
        "You are an expert career coach. Based on the following information, provide personalized career advice:\n\
         \n\
         Skills: {skills}\n\
         Experience Level: {experience}\n\
         Career Goals: {goals}\n\
         \n\
         Please provide a comprehensive career advice response in the following JSON format:\n\
         {ADVICE_SCHEMA}\n\
         \n\
         Make sure the response is valid JSON only, no markdown formatting."
    )
}

fn resume_prompt(resume_text: &str) -> String {
    let excerpt: String = resume_text.chars().take(RESUME_PROMPT_CHAR_LIMIT).collect();
    format!(
        "You are an expert resume parser. Extract the following information from this resume text and return ONLY valid JSON (no markdown, no explanations, just JSON):\n\
         \n\
         Resume Text:\n\
         {excerpt}\n\
         \n\
         Extract and return JSON in this EXACT format (all fields are required):\n\
         {RESUME_SCHEMA}\n\
         \n\
         IMPORTANT:\n\
         - Extract ALL technical skills mentioned (programming languages, frameworks, tools, technologies)\n\
         - Extract work experience as a 2-3 sentence summary\n\
         - Extract ALL projects mentioned (project name and brief description)\n\
         - Extract education degrees/certifications\n\
         - Extract professional summary if available\n\
         - Return ONLY the JSON object, no markdown code blocks, no explanations\n\
         \n\
         JSON:"
    )
}

/// Strip a leading/trailing markdown code fence from model output
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Slice out the first `{` .. last `}` block, if any
pub(crate) fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_json_payload<T: DeserializeOwned>(raw: &str) -> Result<T, GeminiError> {
    let cleaned = strip_json_fences(raw);
    let block = extract_json_block(cleaned).unwrap_or(cleaned);
    serde_json::from_str(block).map_err(|err| GeminiError::ParseError(err.to_string()))
}

/// Fixed advice structure served when the model returned prose instead of JSON
fn fallback_advice(text: &str) -> CareerAdvice {
    let advice = if text.trim().is_empty() {
        "Based on your skills and goals, I recommend focusing on continuous learning and skill development in your chosen field.".to_string()
    } else {
        text.chars().take(500).collect()
    };

    CareerAdvice {
        advice,
        recommended_roles: vec![RecommendedRole {
            title: "Senior Developer".to_string(),
            description: "Matches your experience level and skills".to_string(),
            match_score: "High".to_string(),
        }],
        skills_to_develop: vec![SkillToDevelop {
            skill: "Advanced Technical Skills".to_string(),
            priority: "High".to_string(),
            reason: "Essential for career growth".to_string(),
        }],
        learning_paths: vec![LearningPath {
            path: "Online Courses".to_string(),
            resources: vec![
                "Coursera".to_string(),
                "Udemy".to_string(),
                "edX".to_string(),
            ],
            timeline: "3-6 months".to_string(),
        }],
    }
}
