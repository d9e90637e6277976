//! The default five-stage engineering team.
//!
//! Lead Architect → Frontend Developer → Backend Developer → Test Engineer →
//! Technical Writer. Artifacts are templated from the description, the
//! language and the lead's design documents; no external service is called.

use crate::stages::base::{Stage, StageDescriptor, StageInput};
use crate::stages::scripted::ScriptedStage;
use std::sync::Arc;
use std::time::Duration;
use tf_protocol::{FileType, GeneratedFile};

/// The default team with no artificial delay between steps.
pub fn default_team() -> Vec<Arc<dyn Stage>> {
    default_team_with_pacing(Duration::ZERO)
}

/// The default team, pausing `pace` after every progress step so that
/// live subscribers can watch the pipeline move.
pub fn default_team_with_pacing(pace: Duration) -> Vec<Arc<dyn Stage>> {
    vec![
        Arc::new(lead_architect(pace)),
        Arc::new(frontend_developer(pace)),
        Arc::new(backend_developer(pace)),
        Arc::new(test_engineer(pace)),
        Arc::new(technical_writer(pace)),
    ]
}

fn lead_architect(pace: Duration) -> ScriptedStage {
    ScriptedStage::new(StageDescriptor::new(
        "lead",
        "Lead Architect",
        "Project Lead & System Design",
        "System design and planning",
    ))
    .progress(10, "Analyzing project requirements")
    .pause(pace)
    .progress(25, "Creating system architecture")
    .pause(pace)
    .progress(50, "Writing system design")
    .pause(pace)
    .progress(70, "Planning implementation roadmap")
    .pause(pace)
    .render(|input| {
        vec![
            GeneratedFile::new("SYSTEM_DESIGN.md", system_design(input), FileType::Design),
            GeneratedFile::new(
                "IMPLEMENTATION_ROADMAP.md",
                roadmap(input),
                FileType::Design,
            ),
        ]
    })
}

fn frontend_developer(pace: Duration) -> ScriptedStage {
    ScriptedStage::new(StageDescriptor::new(
        "frontend",
        "Frontend Developer",
        "UI/UX Implementation & Frontend Development",
        "Frontend development",
    ))
    .progress(10, "Reviewing system design")
    .pause(pace)
    .progress(25, "Creating component structure")
    .pause(pace)
    .progress(60, "Implementing user interface")
    .pause(pace)
    .progress(85, "Wiring API client")
    .pause(pace)
    .render(frontend_files)
}

fn backend_developer(pace: Duration) -> ScriptedStage {
    ScriptedStage::new(StageDescriptor::new(
        "backend",
        "Backend Developer",
        "API Development & Backend Services",
        "Backend development",
    ))
    .progress(10, "Reviewing system design")
    .pause(pace)
    .progress(25, "Creating API structure")
    .pause(pace)
    .progress(60, "Implementing services")
    .pause(pace)
    .progress(85, "Writing configuration")
    .pause(pace)
    .render(backend_files)
}

fn test_engineer(pace: Duration) -> ScriptedStage {
    ScriptedStage::new(StageDescriptor::new(
        "qa",
        "Test Engineer",
        "Quality Assurance & Testing",
        "Testing and quality assurance",
    ))
    .progress(15, "Analyzing generated code")
    .pause(pace)
    .progress(45, "Writing backend tests")
    .pause(pace)
    .progress(75, "Writing frontend tests")
    .pause(pace)
    .render(test_files)
}

fn technical_writer(pace: Duration) -> ScriptedStage {
    ScriptedStage::new(StageDescriptor::new(
        "docs",
        "Technical Writer",
        "Documentation & User Guides",
        "Documentation",
    ))
    .progress(20, "Collecting project structure")
    .pause(pace)
    .progress(50, "Writing README")
    .pause(pace)
    .progress(80, "Writing reference documentation")
    .pause(pace)
    .render(documentation_files)
}

fn system_design(input: &StageInput) -> String {
    format!(
        "# System Design\n\n## Overview\n{}\n\n## Technology\n- Language: {}\n- Frontend: single-page client talking to a JSON API\n- Backend: REST service with an in-memory store\n\n## Components\n1. Frontend user interface\n2. Backend API service\n3. Automated test suite\n4. Documentation\n",
        input.description, input.language
    )
}

fn roadmap(input: &StageInput) -> String {
    format!(
        "# Implementation Roadmap\n\nTarget: {}\n\n1. Backend API skeleton ({})\n2. Frontend screens\n3. Integration and tests\n4. Documentation and release\n",
        input.description, input.language
    )
}

fn design_reference(input: &StageInput) -> &str {
    input
        .design_doc
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("no design document")
}

fn is_javascript(language: &str) -> bool {
    matches!(language, "JavaScript/TypeScript" | "JavaScript" | "TypeScript")
}

fn generic_extension(language: &str) -> String {
    language.to_lowercase().replace('/', "_")
}

fn frontend_files(input: &StageInput) -> Vec<GeneratedFile> {
    let header = format!("Design reference: {}", design_reference(input));
    let language = input.language.as_str();

    if is_javascript(language) {
        vec![
            GeneratedFile::new(
                "frontend/package.json",
                "{\n  \"name\": \"frontend\",\n  \"private\": true,\n  \"scripts\": { \"dev\": \"vite\", \"test\": \"jest\" }\n}\n",
                FileType::Frontend,
            ),
            GeneratedFile::new(
                "frontend/src/App.tsx",
                format!(
                    "// {header}\nexport default function App() {{\n  return <h1>{}</h1>;\n}}\n",
                    input.description
                ),
                FileType::Frontend,
            ),
            GeneratedFile::new(
                "frontend/src/services/api.ts",
                "export async function fetchItems() {\n  const res = await fetch('/api/items');\n  return res.json();\n}\n",
                FileType::Frontend,
            ),
        ]
    } else if language == "Python" {
        vec![
            GeneratedFile::new(
                "frontend/app.py",
                format!(
                    "# {header}\nimport streamlit as st\n\nst.title({:?})\n",
                    input.description
                ),
                FileType::Frontend,
            ),
            GeneratedFile::new("frontend/requirements.txt", "streamlit\nrequests\n", FileType::Frontend),
        ]
    } else {
        vec![GeneratedFile::new(
            format!("frontend/main.{}", generic_extension(language)),
            format!("// {header}\n// {} frontend for: {}\n", language, input.description),
            FileType::Frontend,
        )]
    }
}

fn backend_files(input: &StageInput) -> Vec<GeneratedFile> {
    let header = format!("Design reference: {}", design_reference(input));
    let language = input.language.as_str();

    match language {
        "Python" => vec![
            GeneratedFile::new(
                "backend/main.py",
                format!(
                    "# {header}\nfrom fastapi import FastAPI\n\napp = FastAPI(title={:?})\n\n@app.get(\"/api/health\")\ndef health():\n    return {{\"status\": \"ok\"}}\n",
                    input.description
                ),
                FileType::Backend,
            ),
            GeneratedFile::new(
                "backend/models.py",
                "from pydantic import BaseModel\n\nclass Item(BaseModel):\n    id: int\n    title: str\n",
                FileType::Backend,
            ),
            GeneratedFile::new("backend/requirements.txt", "fastapi\nuvicorn\npydantic\n", FileType::Backend),
        ],
        lang if is_javascript(lang) => vec![
            GeneratedFile::new(
                "backend/package.json",
                "{\n  \"name\": \"backend\",\n  \"main\": \"server.js\",\n  \"dependencies\": { \"express\": \"^4.19.0\" }\n}\n",
                FileType::Backend,
            ),
            GeneratedFile::new(
                "backend/server.js",
                format!(
                    "// {header}\nconst express = require('express');\nconst app = express();\napp.get('/api/health', (_req, res) => res.json({{ status: 'ok' }}));\napp.listen(8000);\n"
                ),
                FileType::Backend,
            ),
        ],
        "Java" => vec![GeneratedFile::new(
            "backend/src/main/java/com/engineeringteam/Application.java",
            format!(
                "// {header}\npackage com.engineeringteam;\n\npublic class Application {{\n    public static void main(String[] args) {{}}\n}}\n"
            ),
            FileType::Backend,
        )],
        "C#" => vec![GeneratedFile::new(
            "backend/Program.cs",
            format!("// {header}\nvar app = WebApplication.Create(args);\napp.MapGet(\"/api/health\", () => \"ok\");\napp.Run();\n"),
            FileType::Backend,
        )],
        "Go" => vec![GeneratedFile::new(
            "backend/main.go",
            format!("// {header}\npackage main\n\nfunc main() {{}}\n"),
            FileType::Backend,
        )],
        other => vec![GeneratedFile::new(
            format!("backend/main.{}", generic_extension(other)),
            format!("// {header}\n// {} backend for: {}\n", other, input.description),
            FileType::Backend,
        )],
    }
}

fn test_files(input: &StageInput) -> Vec<GeneratedFile> {
    let backend_count = input
        .prior_artifacts
        .iter()
        .filter(|file| file.file_type == FileType::Backend)
        .count();
    let frontend_count = input
        .prior_artifacts
        .iter()
        .filter(|file| file.file_type == FileType::Frontend)
        .count();
    let language = input.language.as_str();

    let mut files = if language == "Python" {
        vec![
            GeneratedFile::new(
                "tests/test_backend.py",
                "from fastapi.testclient import TestClient\nfrom backend.main import app\n\ndef test_health():\n    assert TestClient(app).get(\"/api/health\").status_code == 200\n",
                FileType::Test,
            ),
            GeneratedFile::new("pytest.ini", "[pytest]\ntestpaths = tests\n", FileType::Test),
        ]
    } else if is_javascript(language) {
        vec![GeneratedFile::new(
            "tests/backend.test.js",
            "test('health endpoint responds', () => {\n  expect(true).toBe(true);\n});\n",
            FileType::Test,
        )]
    } else {
        vec![GeneratedFile::new(
            "tests/integration.test.js",
            format!("// Integration tests for the {language} services\n"),
            FileType::Test,
        )]
    };

    files.push(GeneratedFile::new(
        "TESTING.md",
        format!(
            "# Testing\n\nCovers {backend_count} backend and {frontend_count} frontend files for: {}\n",
            input.description
        ),
        FileType::Test,
    ));
    files
}

fn documentation_files(input: &StageInput) -> Vec<GeneratedFile> {
    let listing: String = input
        .prior_artifacts
        .iter()
        .map(|file| format!("- `{}` ({})\n", file.path, file.file_type))
        .collect();

    vec![
        GeneratedFile::new(
            "README.md",
            format!(
                "# {}\n\nBuilt with {}.\n\n## Project Files\n{listing}",
                input.description, input.language
            ),
            FileType::Documentation,
        ),
        GeneratedFile::new(
            "docs/ARCHITECTURE.md",
            format!("# Architecture\n\n{}\n", input.design_doc),
            FileType::Documentation,
        ),
        GeneratedFile::new(
            "docs/API_REFERENCE.md",
            "# API Reference\n\n| Method | Path | Description |\n|---|---|---|\n| GET | /api/health | Service health |\n",
            FileType::Documentation,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(files: &[GeneratedFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_default_team_order() {
        let team = default_team();
        let names: Vec<&str> = team.iter().map(|s| s.descriptor().name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Lead Architect",
                "Frontend Developer",
                "Backend Developer",
                "Test Engineer",
                "Technical Writer",
            ]
        );
    }

    #[test]
    fn test_backend_files_follow_language() {
        let python = backend_files(&StageInput::new("todo", "Python"));
        assert_eq!(
            paths(&python),
            vec!["backend/main.py", "backend/models.py", "backend/requirements.txt"]
        );

        let go = backend_files(&StageInput::new("todo", "Go"));
        assert_eq!(paths(&go), vec!["backend/main.go"]);

        let other = backend_files(&StageInput::new("todo", "Objective/C"));
        assert_eq!(paths(&other), vec!["backend/main.objective_c"]);
    }

    #[test]
    fn test_frontend_uses_design_reference() {
        let input = StageInput::new("todo", "TypeScript").with_design_doc("\n# System Design\nmore");
        let files = frontend_files(&input);

        assert_eq!(files.len(), 3);
        assert!(files[1].content.contains("Design reference: # System Design"));
    }

    #[test]
    fn test_frontend_tolerates_missing_design() {
        let files = frontend_files(&StageInput::new("todo", "Python"));
        assert!(files[0].content.contains("no design document"));
    }

    #[test]
    fn test_tests_count_prior_artifacts() {
        let input = StageInput::new("todo", "Rust").with_prior_artifacts(vec![
            GeneratedFile::new("backend/main.rs", "", FileType::Backend),
            GeneratedFile::new("frontend/main.rs", "", FileType::Frontend),
            GeneratedFile::new("backend/lib.rs", "", FileType::Backend),
        ]);
        let files = test_files(&input);

        let testing = files.last().unwrap();
        assert_eq!(testing.path, "TESTING.md");
        assert!(testing.content.contains("2 backend and 1 frontend"));
    }
}
