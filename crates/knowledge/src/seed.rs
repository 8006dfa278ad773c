//! Built-in course corpus.
//!
//! Used when the workspace does not configure a corpus file. Order matters:
//! it is the tie-break order for equal relevance scores.

use crate::types::{CorpusFile, Document, ForumPost};
use chrono::NaiveDate;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn documents() -> Vec<Document> {
    vec![
        Document {
            id: "week1".to_string(),
            title: "Introduction to Tools in Data Science".to_string(),
            content: "Tools in Data Science course overview:\n\
                      - Python programming fundamentals\n\
                      - Version control with Git\n\
                      - Data analysis libraries (pandas, numpy)\n\
                      - API usage and web scraping\n\
                      - Machine learning basics\n\
                      - Assignment submission guidelines"
                .to_string(),
            topics: strings(&["python", "git", "pandas", "numpy", "apis", "ml"]),
        },
        Document {
            id: "week2".to_string(),
            title: "Python Environment Setup".to_string(),
            content: "Setting up Python environment for TDS:\n\
                      - Install Python 3.8+ from python.org\n\
                      - Use pip for package management\n\
                      - Virtual environments with venv\n\
                      - Jupyter notebook setup\n\
                      - Common packages: pandas, numpy, matplotlib, seaborn"
                .to_string(),
            topics: strings(&["python", "setup", "environment", "jupyter", "packages"]),
        },
        Document {
            id: "assignments".to_string(),
            title: "Assignment Guidelines".to_string(),
            content: "TDS assignment submission guidelines:\n\
                      - Submit through the designated platform\n\
                      - Include proper documentation\n\
                      - Follow naming conventions\n\
                      - Test your code before submission\n\
                      - Use version control for tracking changes"
                .to_string(),
            topics: strings(&["assignments", "submission", "guidelines", "documentation"]),
        },
        Document {
            id: "apis".to_string(),
            title: "API Usage in Data Science".to_string(),
            content: "Working with APIs in data science:\n\
                      - RESTful API concepts\n\
                      - HTTP methods (GET, POST, PUT, DELETE)\n\
                      - Authentication (API keys, OAuth)\n\
                      - Rate limiting and error handling\n\
                      - Popular APIs: OpenAI, Twitter, Reddit\n\
                      - Python requests library usage"
                .to_string(),
            topics: strings(&["api", "rest", "http", "authentication", "requests", "openai"]),
        },
    ]
}

fn posts() -> Vec<ForumPost> {
    vec![
        ForumPost {
            id: "155939".to_string(),
            title: "GA5 Question 8 Clarification".to_string(),
            url: "https://discourse.onlinedegree.iitm.ac.in/t/ga5-question-8-clarification/155939/4"
                .to_string(),
            content: "You must use gpt-3.5-turbo-0125, even if the AI Proxy only supports \
                      gpt-4o-mini. Use the OpenAI API directly for this question. The assignment \
                      specifically requires gpt-3.5-turbo-0125 for consistency in grading."
                .to_string(),
            tags: strings(&["gpt", "ai-proxy", "assignment", "openai", "api"]),
            category: "assignments".to_string(),
            created_at: date(2025, 4, 10),
            replies: 8,
        },
        ForumPost {
            id: "156001".to_string(),
            title: "Python Environment Setup Issues".to_string(),
            url: "https://discourse.onlinedegree.iitm.ac.in/t/python-setup-issues/156001"
                .to_string(),
            content: "Common Python setup issues and solutions: 1) Use Python 3.8 or higher, \
                      2) Create a virtual environment with 'python -m venv tds_env', \
                      3) Activate it with 'source tds_env/bin/activate' (Linux/Mac) or \
                      'tds_env\\Scripts\\activate' (Windows), 4) Install required packages \
                      with 'pip install -r requirements.txt'"
                .to_string(),
            tags: strings(&["python", "setup", "environment", "virtual-env", "pip"]),
            category: "technical-help".to_string(),
            created_at: date(2025, 4, 8),
            replies: 12,
        },
        ForumPost {
            id: "155876".to_string(),
            title: "API Rate Limiting Best Practices".to_string(),
            url: "https://discourse.onlinedegree.iitm.ac.in/t/api-rate-limiting/155876".to_string(),
            content: "When working with APIs, implement proper rate limiting: 1) Check the API \
                      documentation for limits, 2) Sleep between requests, 3) Use exponential \
                      backoff for retries, 4) Cache responses when possible, 5) Use batch \
                      requests if the API supports them"
                .to_string(),
            tags: strings(&["api", "rate-limiting", "best-practices", "requests"]),
            category: "programming-help".to_string(),
            created_at: date(2025, 4, 5),
            replies: 6,
        },
        ForumPost {
            id: "155654".to_string(),
            title: "Assignment Submission Format".to_string(),
            url: "https://discourse.onlinedegree.iitm.ac.in/t/assignment-format/155654".to_string(),
            content: "Proper assignment submission format: 1) Create a main.py file with your \
                      solution, 2) Include requirements.txt with dependencies, 3) Add a README.md \
                      with an explanation, 4) Use meaningful variable names and comments, \
                      5) Test your code thoroughly before submission"
                .to_string(),
            tags: strings(&["assignment", "submission", "format", "requirements"]),
            category: "assignments".to_string(),
            created_at: date(2025, 3, 28),
            replies: 15,
        },
        ForumPost {
            id: "155432".to_string(),
            title: "Git Version Control for TDS".to_string(),
            url: "https://discourse.onlinedegree.iitm.ac.in/t/git-version-control/155432"
                .to_string(),
            content: "Using Git for TDS assignments: 1) Initialize a repo with 'git init', \
                      2) Add files with 'git add .', 3) Commit with meaningful messages \
                      'git commit -m \"message\"', 4) Create branches for different features, \
                      5) Push to GitHub for backup and collaboration"
                .to_string(),
            tags: strings(&["git", "version-control", "github", "collaboration"]),
            category: "tools".to_string(),
            created_at: date(2025, 3, 20),
            replies: 9,
        },
    ]
}

/// The built-in corpus.
pub fn builtin_corpus() -> CorpusFile {
    CorpusFile {
        documents: documents(),
        posts: posts(),
    }
}
