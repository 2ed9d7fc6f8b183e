use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use worksheet_catalog::{PLACEHOLDER_THUMBNAIL, WorksheetRecord, from_slug, to_slug};

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Parser)]
#[command(name = "worksheets")]
#[command(about = "Browse the worksheet catalog through the proxy API", long_about = None)]
struct Cli {
    /// Base URL of the worksheets proxy API
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the URL slug for a label
    Slug {
        /// Label words (joined with spaces)
        #[arg(required = true)]
        label: Vec<String>,
    },
    /// Guess a display title from a slug
    Title { slug: String },
    /// List subjects known to the upstream API
    Subjects,
    /// List worksheets for a subject, optionally narrowed to a subtopic
    List {
        subject: String,
        subtopic: Option<String>,
    },
    /// Show a single worksheet
    Show {
        subject: String,
        subtopic: String,
        worksheet: String,
    },
    /// Ask for a worksheet download link by email
    Request {
        subject: String,
        subtopic: String,
        worksheet: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile: String,
    },
}

#[derive(Deserialize, Debug)]
struct CatalogResponse<T> {
    data: T,
    #[serde(default)]
    subtopics: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let api = ApiClient::new(&cli.api_url);

    match cli.command {
        Commands::Slug { label } => println!("{}", to_slug(&label.join(" "))),
        Commands::Title { slug } => println!("{}", from_slug(&slug)),
        Commands::Subjects => list_subjects(&api).await?,
        Commands::List { subject, subtopic } => {
            list_worksheets(&api, &subject, subtopic.as_deref()).await?
        }
        Commands::Show {
            subject,
            subtopic,
            worksheet,
        } => show_worksheet(&api, &subject, &subtopic, &worksheet).await?,
        Commands::Request {
            subject,
            subtopic,
            worksheet,
            name,
            email,
            mobile,
        } => {
            let contact = Contact {
                name,
                email,
                mobile,
            };
            request_worksheet(&api, &subject, &subtopic, &worksheet, contact).await?
        }
    }

    Ok(())
}

struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn worksheets_url(&self, segments: &[&str]) -> String {
        let mut url = format!("{}/worksheets", self.base_url);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// GET a JSON body; `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send request to worksheets API")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = read_success(response).await?;
        Ok(Some(body))
    }

    async fn post_json<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request to worksheets API")?;
        read_success(response).await
    }
}

async fn read_success<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        return Err(anyhow::anyhow!("Request failed ({}): {}", status, message));
    }

    response
        .json()
        .await
        .context("Failed to parse worksheets API response")
}

async fn list_subjects(api: &ApiClient) -> Result<()> {
    let url = format!("{}/subjects", api.base_url);
    let subjects: Value = api
        .get_json(&url)
        .await?
        .context("Subjects endpoint not found")?;

    println!("{}", serde_json::to_string_pretty(&subjects)?);
    Ok(())
}

async fn list_worksheets(api: &ApiClient, subject: &str, subtopic: Option<&str>) -> Result<()> {
    let mut segments = vec![subject];
    segments.extend(subtopic);

    let response: CatalogResponse<Vec<WorksheetRecord>> = api
        .get_json(&api.worksheets_url(&segments))
        .await?
        .context("Worksheet listing endpoint not found")?;

    if response.data.is_empty() {
        println!("No worksheets found.");
        return Ok(());
    }

    if let Some(subtopics) = &response.subtopics {
        println!("Subtopics: {}", subtopics.join(", "));
        println!();
    }

    for record in &response.data {
        println!(
            "{:>6}  {}  ({} / {})",
            record.id.to_string(),
            record.title,
            record.subject,
            record.subtopic
        );
    }
    Ok(())
}

async fn fetch_worksheet(
    api: &ApiClient,
    subject: &str,
    subtopic: &str,
    worksheet: &str,
) -> Result<WorksheetRecord> {
    let url = api.worksheets_url(&[subject, subtopic, worksheet]);
    let response: CatalogResponse<WorksheetRecord> = api
        .get_json(&url)
        .await?
        .with_context(|| format!("Worksheet not found: {}", from_slug(&to_slug(worksheet))))?;
    Ok(response.data)
}

async fn show_worksheet(
    api: &ApiClient,
    subject: &str,
    subtopic: &str,
    worksheet: &str,
) -> Result<()> {
    let record = fetch_worksheet(api, subject, subtopic, worksheet).await?;

    println!("{}", record.title);
    println!("  ID:        {}", record.id);
    println!("  Subject:   {}", record.subject);
    println!("  Subtopic:  {}", record.subtopic);
    println!("  Thumbnail: {}", record.thumbnail_or(PLACEHOLDER_THUMBNAIL));
    if let Some(created_at) = &record.created_at {
        println!("  Created:   {}", created_at);
    }
    if !record.description.is_empty() {
        println!();
        println!("{}", record.description);
    }
    Ok(())
}

struct Contact {
    name: String,
    email: String,
    mobile: String,
}

#[derive(Deserialize, Debug)]
struct SendEmailResponse {
    #[serde(default)]
    success: bool,
}

async fn request_worksheet(
    api: &ApiClient,
    subject: &str,
    subtopic: &str,
    worksheet: &str,
    contact: Contact,
) -> Result<()> {
    let record = fetch_worksheet(api, subject, subtopic, worksheet).await?;
    let worksheet_id = record
        .id
        .as_number()
        .with_context(|| format!("Worksheet ID is not numeric: {}", record.id))?;

    let body = json!({
        "name": &contact.name,
        "email": &contact.email,
        "mobile": &contact.mobile,
        "worksheet_id": worksheet_id,
        "subject": subject,
        "subtopic": subtopic,
    });

    let url = format!("{}/send-email", api.base_url);
    let response: SendEmailResponse = api.post_json(&url, &body).await?;
    if !response.success {
        return Err(anyhow::anyhow!("Email sending failed."));
    }

    println!("✓ Download link for \"{}\" sent to {}", record.title, contact.email);
    println!("  The link expires after 4 hours.");
    Ok(())
}
