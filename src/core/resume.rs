use regex::{Regex, RegexSet};

use crate::models::ExtractedResume;

/// Upload ceiling for resume PDFs
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Caps on extracted fallback entries
const MAX_PROJECTS: usize = 5;
const MAX_EDUCATION: usize = 3;

/// Technical terms the fallback extractor recognizes. Matched on word
/// boundaries, case-insensitive; the canonical casing here is what lands in
/// the profile.
const SKILL_VOCABULARY: &[&str] = &[
    // Programming languages
    "JavaScript", "TypeScript", "Python", "Java", "C++", "C#", "PHP", "Ruby", "Go", "Rust",
    "Swift", "Kotlin",
    // Frontend
    "React", "Angular", "Vue", "Next.js", "HTML", "CSS", "SASS", "SCSS", "Tailwind", "Bootstrap",
    "jQuery",
    // Backend
    "Node.js", "Express", "Django", "Flask", "Spring", "Laravel", "ASP.NET", "FastAPI",
    // Databases
    "SQL", "MongoDB", "PostgreSQL", "MySQL", "Redis", "Firebase", "DynamoDB", "Oracle",
    // Cloud and devops
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Jenkins", "CI/CD", "Terraform",
    // Tooling and process
    "Git", "GitHub", "GitLab", "Agile", "Scrum", "JIRA", "Confluence",
    // Broader technologies
    "Machine Learning", "AI", "Data Science", "TensorFlow", "PyTorch", "REST API", "GraphQL",
    "WebSocket", "Microservices", "Serverless", "Blockchain", "Solidity",
];

/// Text content of an in-memory PDF
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, pdf_extract::OutputError> {
    pdf_extract::extract_text_from_mem(bytes)
}

/// Deterministic resume extraction used whenever the model path is out
///
/// Keyword and section-pattern based; always returns a fully populated
/// structure so callers never have to distinguish the two extraction paths.
pub fn extract_fallback(text: &str) -> ExtractedResume {
    ExtractedResume {
        skills: extract_skills(text),
        experience: extract_experience_summary(text),
        projects: extract_projects(text),
        education: extract_education(text),
        summary: String::new(),
    }
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("valid extraction pattern")
}

/// Vocabulary terms present in the text, canonical casing, input order
fn extract_skills(text: &str) -> Vec<String> {
    let patterns: Vec<String> = SKILL_VOCABULARY
        .iter()
        .map(|term| format!(r"(?i)\b{}\b", regex::escape(&term.to_lowercase())))
        .collect();
    let set = RegexSet::new(&patterns).expect("valid skill vocabulary patterns");

    let hits = set.matches(text);
    SKILL_VOCABULARY
        .iter()
        .enumerate()
        .filter(|(idx, _)| hits.matched(*idx))
        .map(|(_, term)| term.to_string())
        .collect()
}

fn extract_projects(text: &str) -> Vec<String> {
    let section_patterns = [
        r"(?i)(?:projects?|portfolio|work experience|experience)[\s\S]{0,2000}",
        r"(?i)(?:built|developed|created|designed)[\s\S]{0,300}",
    ];
    let lead_in = pattern(
        r"(?i)(?:projects?|portfolio|work experience|experience|built|developed|created|designed)[:\s]*",
    );

    let mut projects = Vec::new();
    for source in section_patterns {
        let re = pattern(source);
        for found in re.find_iter(text).take(MAX_PROJECTS) {
            let cleaned = lead_in.replace(found.as_str(), "").trim().to_string();
            let len = cleaned.chars().count();
            if len > 30 && len < 300 {
                projects.push(cleaned.chars().take(200).collect());
            }
        }
    }

    let mut deduped = dedupe(projects);
    deduped.truncate(MAX_PROJECTS);
    deduped
}

fn extract_education(text: &str) -> Vec<String> {
    let section_patterns = [
        r"(?i)(?:bachelor|master|phd|doctorate|degree|b\.?s\.?|m\.?s\.?|ph\.?d\.?)[\s\S]{0,200}",
        r"(?i)(?:university|college|institute)[\s\S]{0,150}",
    ];

    let mut education = Vec::new();
    for source in section_patterns {
        let re = pattern(source);
        for found in re.find_iter(text).take(MAX_EDUCATION) {
            let cleaned = found.as_str().trim().to_string();
            let len = cleaned.chars().count();
            if len > 10 && len < 200 {
                education.push(cleaned.chars().take(150).collect());
            }
        }
    }

    let mut deduped = dedupe(education);
    deduped.truncate(MAX_EDUCATION);
    deduped
}

/// Experience summary: a section snippet when one is long enough, otherwise a
/// synthesized years line, otherwise the fixed placeholder
fn extract_experience_summary(text: &str) -> String {
    let section_patterns = [
        r"(?i)(?:experience|work history|employment)[\s\S]{0,1000}",
        r"(?i)(?:years? of|experience in|worked as|role as)[\s\S]{0,500}",
    ];

    let mut summary = String::new();
    for source in section_patterns {
        if let Some(found) = pattern(source).find(text) {
            let snippet: String = found.as_str().chars().take(300).collect();
            if snippet.chars().count() > 50 {
                summary = snippet;
            }
        }
    }

    if !summary.is_empty() {
        return summary;
    }

    let years = pattern(r"(?i)(\d+)\s*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)");
    if let Some(caps) = years.captures(text) {
        return format!("{} years of professional experience", &caps[1]);
    }

    "Professional experience extracted from resume".to_string()
}

/// Drop repeats while keeping first-seen order
fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_vocabulary_terms_with_canonical_casing() {
        let text = "Shipped services in rust and typescript, deployed with docker on AWS, \
                    data in postgresql.";
        let skills = extract_skills(text);

        assert!(skills.contains(&"Rust".to_string()));
        assert!(skills.contains(&"TypeScript".to_string()));
        assert!(skills.contains(&"Docker".to_string()));
        assert!(skills.contains(&"AWS".to_string()));
        assert!(skills.contains(&"PostgreSQL".to_string()));
    }

    #[test]
    fn word_boundaries_prevent_substring_hits() {
        let skills = extract_skills("Deep JavaScript expertise.");
        assert!(skills.contains(&"JavaScript".to_string()));
        assert!(!skills.contains(&"Java".to_string()));
    }

    #[test]
    fn skills_come_back_deduplicated() {
        let skills = extract_skills("React, react and more React everywhere.");
        assert_eq!(
            skills.iter().filter(|s| s.as_str() == "React").count(),
            1
        );
    }

    #[test]
    fn project_sections_are_cleaned_and_captured() {
        let text = "Projects: Built a full-stack e-commerce platform with React and Node.js \
                    for local merchants.";
        let projects = extract_projects(text);

        assert!(!projects.is_empty());
        assert!(projects[0].starts_with("Built a full-stack"));
        assert!(projects.len() <= MAX_PROJECTS);
    }

    #[test]
    fn short_and_oversized_fragments_are_dropped() {
        // Nothing between 30 and 300 characters survives the cleanup
        let projects = extract_projects("Projects: tiny");
        assert!(projects.is_empty());
    }

    #[test]
    fn education_entry_is_captured_from_a_short_section() {
        let text = "Bachelor of Science in Computer Science, State University";
        let education = extract_education(text);

        assert_eq!(education.len(), 1);
        assert!(education[0].starts_with("Bachelor of Science"));
    }

    #[test]
    fn education_entries_are_capped() {
        let text = "Bachelor of Science in Computer Science at State University. \
                    Master of Science in Distributed Systems at Tech Institute. \
                    Bachelor of Arts in Mathematics at City College. \
                    Master of Engineering in Robotics at Polytechnic University.";
        let education = extract_education(text);

        assert!(education.len() <= MAX_EDUCATION);
    }

    #[test]
    fn years_line_is_synthesized_when_sections_are_thin() {
        let summary = extract_experience_summary("5 years of experience");
        assert_eq!(summary, "5 years of professional experience");
        assert!(summary.contains('5'));
    }

    #[test]
    fn placeholder_when_nothing_matches() {
        let summary = extract_experience_summary("hello world");
        assert_eq!(summary, "Professional experience extracted from resume");
    }

    #[test]
    fn fallback_structure_is_always_fully_populated() {
        let extracted = extract_fallback("short note");

        assert!(extracted.skills.is_empty());
        assert!(!extracted.experience.is_empty());
        assert!(extracted.projects.is_empty());
        assert!(extracted.education.is_empty());
        assert_eq!(extracted.summary, "");
    }

    #[test]
    fn long_experience_section_becomes_the_summary() {
        let text = "Experience: eight years leading backend teams across fintech and \
                    logistics, owning service reliability and mentoring engineers.";
        let summary = extract_experience_summary(text);

        assert!(summary.chars().count() > 50);
        assert!(summary.to_lowercase().starts_with("experience"));
    }

    #[test]
    fn invalid_pdf_bytes_error_cleanly() {
        assert!(extract_pdf_text(b"definitely not a pdf").is_err());
    }
}
