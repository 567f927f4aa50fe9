//! The `studyflow init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("studyflow.toml").exists() {
        println!("studyflow.toml already exists, skipping.");
    } else {
        std::fs::write("studyflow.toml", SAMPLE_CONFIG)?;
        println!("Created studyflow.toml");
    }

    std::fs::create_dir_all("questions")?;
    let example_path = std::path::Path::new("questions/example.json");
    if example_path.exists() {
        println!("questions/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTIONS)?;
        println!("Created questions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: studyflow validate --questions questions/example.json");
    println!("  2. Run: studyflow grade --questions questions/example.json --id capital-uk --answer B --save");
    println!("  3. Run: studyflow stats --questions questions/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studyflow configuration

# Identifier recorded in saved reports (or set STUDYFLOW_ID)
# studyflow_id = "${STUDYFLOW_ID}"

output_dir = "./studyflow-results"
default_format = "text"
"#;

const EXAMPLE_QUESTIONS: &str = r#"[
  {
    "id": "capital-uk",
    "type": "MULTIPLE_CHOICE",
    "question": "What is the capital of the United Kingdom?",
    "answers": "[Paris, London, Rome]",
    "expectedAnswer": "London",
    "answered": false,
    "tags": "geography, capitals",
    "lastReviewedAt": null
  },
  {
    "id": "boiling-point",
    "type": "TRUE_FALSE",
    "question": "Water boils at 100 degrees Celsius at sea level.",
    "answers": "[]",
    "expectedAnswer": "true",
    "answered": false,
    "tags": "physics",
    "lastReviewedAt": null
  },
  {
    "id": "capital-france",
    "type": "SHORT_ANSWER",
    "question": "What is the capital of France?",
    "answers": "[]",
    "expectedAnswer": "Paris",
    "answered": false,
    "tags": "geography, capitals",
    "lastReviewedAt": null
  },
  {
    "id": "photosynthesis",
    "type": "FILL_IN_THE_BLANK",
    "question": "Plants convert light into chemical energy through ____.",
    "answers": "[]",
    "expectedAnswer": "photosynthesis",
    "answered": false,
    "tags": "biology",
    "lastReviewedAt": null
  }
]
"#;
