use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use classroom_copilot::api::types::{Accepted, Assignment, AssignmentDraft, Course, DraftReview};
use classroom_copilot::api::{ApiClient, ClientError};
use classroom_copilot::classroom::{Classroom, ViewError};
use classroom_copilot::config::{ClientConfig, ConfigError};
use classroom_copilot::guard::{AuthState, Navigation, Route, RouteGuard};
use classroom_copilot::oauth::OAuthCoordinator;
use classroom_copilot::session::SessionStore;
use classroom_copilot::storage::FileStorage;
use classroom_copilot::views::{self, LoginView};

/// Upper bound on chained redirects followed by one navigation.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `copilot login` and open the printed URL")]
    LoginRequired,
    #[error("{status}")]
    View { status: String },
    #[error("no view at {0}")]
    NotFound(String),
    #[error("too many redirects starting at {0}")]
    RedirectLoop(String),
    #[error("login did not complete; run `copilot login` to try again")]
    LoginIncomplete,
    #[error("nothing to update; pass --edits and/or --final")]
    EmptyReview,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LoginRequired => "E_LOGIN_REQUIRED",
            Self::View { .. } => "E_VIEW",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::RedirectLoop(_) => "E_REDIRECT_LOOP",
            Self::LoginIncomplete => "E_LOGIN_INCOMPLETE",
            Self::EmptyReview => "E_EMPTY_REVIEW",
            Self::Config(_) => "E_CONFIG",
            Self::Client(e) => e.error_code(),
            Self::InvalidJson(_) => "E_INVALID_JSON",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Client(e) if e.retryable())
    }

    /// Object printed to stdout under `--json`.
    fn json_report(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "retryable": self.retryable(),
        })
    }

    /// Lines printed to stderr.
    fn human_report(&self) -> Vec<String> {
        let mut lines = vec![format!("error: {self}")];
        if self.retryable() {
            lines.push("the backend may be temporarily unavailable; try again".to_owned());
        }
        lines
    }
}

impl From<ViewError> for CliError {
    fn from(e: ViewError) -> Self {
        match e {
            ViewError::Redirect(Route::Login) => Self::LoginRequired,
            ViewError::Redirect(other) => Self::View { status: format!("redirected to {other}") },
            ViewError::Client(e) => Self::Client(e),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "copilot", about = "Classroom Copilot client")]
struct Cli {
    #[arg(long, env = "COPILOT_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "COPILOT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Print raw JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the Google authorization URL to open in a browser.
    Login,
    /// Finish login with the URL the browser was redirected to.
    Callback(CallbackArgs),
    Logout,
    Whoami,
    Status,
    /// Navigate to a client path, e.g. `/dashboard` or `/courses/3`.
    Open {
        path: String,
    },
    Courses(CoursesCommand),
    Assignments(AssignmentsCommand),
    Drafts(DraftsCommand),
}

#[derive(Args, Debug)]
struct CallbackArgs {
    #[arg(required_unless_present_all = ["code", "state"])]
    url: Option<String>,

    #[arg(long, requires = "state")]
    code: Option<String>,

    #[arg(long, requires = "code")]
    state: Option<String>,

    /// Follow the redirect immediately instead of after the status delay.
    #[arg(long, default_value_t = false)]
    no_wait: bool,
}

#[derive(Args, Debug)]
struct CoursesCommand {
    #[command(subcommand)]
    command: CoursesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CoursesSubcommand {
    List,
    Sync,
}

#[derive(Args, Debug)]
struct AssignmentsCommand {
    #[command(subcommand)]
    command: AssignmentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AssignmentsSubcommand {
    List {
        course_id: i64,
        /// Include already submitted assignments.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    Show {
        assignment_id: i64,
    },
    SyncMaterials {
        assignment_id: i64,
    },
    Submit {
        assignment_id: i64,
        #[arg(long)]
        draft: i64,
    },
}

#[derive(Args, Debug)]
struct DraftsCommand {
    #[command(subcommand)]
    command: DraftsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DraftsSubcommand {
    Generate {
        assignment_id: i64,
    },
    Show {
        draft_id: i64,
    },
    Review {
        draft_id: i64,
        #[arg(long)]
        edits: Option<String>,
        #[arg(long = "final")]
        final_content: Option<String>,
    },
}

struct App {
    storage: Arc<FileStorage>,
    api: ApiClient,
    guard: RouteGuard,
    oauth: OAuthCoordinator<ApiClient>,
    classroom: Classroom<ApiClient>,
    json: bool,
}

impl App {
    fn new(config: &ClientConfig, json: bool) -> Result<Self, CliError> {
        let storage = Arc::new(FileStorage::new(&config.session_file));
        let session = SessionStore::new(storage.clone());
        let api = ApiClient::new(config)?;
        Ok(Self {
            guard: RouteGuard::new(session.clone()),
            oauth: OAuthCoordinator::new(api.clone(), session.clone()),
            classroom: Classroom::new(api.clone(), session),
            storage,
            api,
            json,
        })
    }

    fn session(&self) -> &SessionStore {
        self.oauth.session()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let json = cli.json;
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                println!("{}", e.json_report());
            }
            for line in e.human_report() {
                eprintln!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = ClientConfig::new(base_url, config.session_file, config.timeouts)?;
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }
    let app = App::new(&config, cli.json)?;

    match cli.command {
        Command::Login => run_login(&app).await,
        Command::Callback(args) => run_callback(&app, args).await,
        Command::Logout => run_logout(&app).await,
        Command::Whoami => run_whoami(&app),
        Command::Status => run_status(&app),
        Command::Open { path } => navigate(&app, Route::parse(&path)).await,
        Command::Courses(courses) => run_courses(&app, courses).await,
        Command::Assignments(assignments) => run_assignments(&app, assignments).await,
        Command::Drafts(drafts) => run_drafts(&app, drafts).await,
    }
}

// =============================================================================
// AUTH COMMANDS
// =============================================================================

async fn run_login(app: &App) -> Result<(), CliError> {
    if app.session().is_authenticated() {
        eprintln!("already logged in; continuing to a fresh login");
    }
    match views::login_view(&app.oauth).await {
        LoginView::OpenProvider { authorization_url } => {
            eprintln!("open this URL in a browser, then run `copilot callback <redirected URL>`:");
            println!("{authorization_url}");
            Ok(())
        }
        LoginView::Failed { status, .. } => Err(CliError::View { status }),
    }
}

async fn run_callback(app: &App, args: CallbackArgs) -> Result<(), CliError> {
    let outcome = match (&args.url, &args.code, &args.state) {
        (_, Some(code), Some(state)) => views::callback_view_with(&app.oauth, code, state).await,
        (Some(url), _, _) => views::callback_view(&app.oauth, url).await,
        _ => views::callback_view_with(&app.oauth, "", "").await,
    };

    eprintln!("{}", outcome.status);
    if !args.no_wait {
        tokio::time::sleep(outcome.delay).await;
    }
    match outcome.next {
        Route::Login => Err(CliError::LoginIncomplete),
        next => navigate(app, next).await,
    }
}

async fn run_logout(app: &App) -> Result<(), CliError> {
    app.oauth.logout().await?;
    eprintln!("logged out");
    Ok(())
}

fn run_whoami(app: &App) -> Result<(), CliError> {
    let user = app.session().current_user().ok_or(CliError::LoginRequired)?;
    if app.json {
        return print_json(&user);
    }
    println!("{} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}

fn run_status(app: &App) -> Result<(), CliError> {
    let state = app.guard.auth_state();
    if app.json {
        return print_json(&serde_json::json!({
            "authenticated": state == AuthState::Authenticated,
            "api_base_url": app.api.base_url(),
            "session_file": app.storage.path(),
        }));
    }
    println!("api:      {}", app.api.base_url());
    println!("session:  {}", app.storage.path().display());
    println!("state:    {state:?}");
    Ok(())
}

// =============================================================================
// NAVIGATION
// =============================================================================

async fn navigate(app: &App, mut route: Route) -> Result<(), CliError> {
    let start = route.path();
    for _ in 0..MAX_REDIRECTS {
        match app.guard.evaluate(route) {
            Navigation::Redirect(Route::Login) => return Err(CliError::LoginRequired),
            Navigation::Redirect(next) => route = next,
            Navigation::Render(view) => return render(app, view).await,
        }
    }
    Err(CliError::RedirectLoop(start))
}

async fn render(app: &App, route: Route) -> Result<(), CliError> {
    match route {
        Route::Login => run_login(app).await,
        Route::Dashboard => show_courses(app, app.classroom.courses().await?),
        Route::Course { course_id } => {
            show_assignments(app, app.classroom.assignments(course_id, false).await?, false)
        }
        Route::Assignment { assignment_id } => show_assignment(app, &app.classroom.assignment(assignment_id).await?),
        Route::Draft { draft_id } => show_draft(app, &app.classroom.draft(draft_id).await?),
        Route::OAuthCallback => Err(CliError::View {
            status: "use `copilot callback <URL>` to complete a login".to_owned(),
        }),
        Route::Root => Err(CliError::RedirectLoop("/".to_owned())),
        Route::NotFound(path) => Err(CliError::NotFound(path)),
    }
}

// =============================================================================
// DATA COMMANDS
// =============================================================================

async fn run_courses(app: &App, courses: CoursesCommand) -> Result<(), CliError> {
    match courses.command {
        CoursesSubcommand::List => show_courses(app, app.classroom.courses().await?),
        CoursesSubcommand::Sync => show_accepted(app, &app.classroom.sync_courses().await?),
    }
}

async fn run_assignments(app: &App, assignments: AssignmentsCommand) -> Result<(), CliError> {
    match assignments.command {
        AssignmentsSubcommand::List { course_id, all } => {
            show_assignments(app, app.classroom.assignments(course_id, all).await?, all)
        }
        AssignmentsSubcommand::Show { assignment_id } => {
            show_assignment(app, &app.classroom.assignment(assignment_id).await?)
        }
        AssignmentsSubcommand::SyncMaterials { assignment_id } => {
            show_accepted(app, &app.classroom.sync_materials(assignment_id).await?)
        }
        AssignmentsSubcommand::Submit { assignment_id, draft } => {
            show_accepted(app, &app.classroom.submit(assignment_id, draft).await?)
        }
    }
}

async fn run_drafts(app: &App, drafts: DraftsCommand) -> Result<(), CliError> {
    match drafts.command {
        DraftsSubcommand::Generate { assignment_id } => {
            show_accepted(app, &app.classroom.generate_draft(assignment_id).await?)
        }
        DraftsSubcommand::Show { draft_id } => show_draft(app, &app.classroom.draft(draft_id).await?),
        DraftsSubcommand::Review { draft_id, edits, final_content } => {
            let review = DraftReview { user_edits: edits, final_content_for_submission: final_content };
            if review.is_empty() {
                return Err(CliError::EmptyReview);
            }
            show_draft(app, &app.classroom.review_draft(draft_id, review).await?)
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn show_courses(app: &App, courses: Vec<Course>) -> Result<(), CliError> {
    if app.json {
        return print_json(&courses);
    }
    if courses.is_empty() {
        println!("No courses found or you haven't synced yet. Try `copilot courses sync`.");
        return Ok(());
    }
    for course in courses {
        match course.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => println!("{:>6}  {}: {description}", course.id, course.name),
            None => println!("{:>6}  {}", course.id, course.name),
        }
    }
    Ok(())
}

fn show_assignments(app: &App, assignments: Vec<Assignment>, include_submitted: bool) -> Result<(), CliError> {
    if app.json {
        return print_json(&assignments);
    }
    if assignments.is_empty() {
        println!("{}", empty_assignments_message(include_submitted));
        return Ok(());
    }
    for a in assignments {
        let due = a.due_date.as_deref().unwrap_or("no due date");
        println!("{:>6}  {:<20} {:<22} {}", a.id, a.status.label(), due, a.title);
    }
    Ok(())
}

fn empty_assignments_message(include_submitted: bool) -> &'static str {
    if include_submitted {
        "No assignments found for this course."
    } else {
        "No unsubmitted assignments found for this course. Use --all to include submitted ones."
    }
}

fn show_assignment(app: &App, a: &Assignment) -> Result<(), CliError> {
    if app.json {
        return print_json(a);
    }
    println!("{} (id {}, course {})", a.title, a.id, a.course);
    println!("status:   {}", a.status.label());
    if a.status.is_in_progress() {
        println!("          a backend job is running; check back shortly");
    }
    if let Some(due) = &a.due_date {
        println!("due:      {due}");
    }
    if let Some(link) = &a.google_link {
        println!("link:     {link}");
    }
    if let Some(description) = &a.description {
        println!("\n{description}");
    }
    if !a.materials.is_empty() {
        println!("\nmaterials:");
        for m in &a.materials {
            println!("  {:>6}  {:<12} {}", m.id, m.processing_status, m.title);
        }
    }
    Ok(())
}

fn show_draft(app: &App, d: &AssignmentDraft) -> Result<(), CliError> {
    if app.json {
        return print_json(d);
    }
    println!("draft {} for assignment {} ({})", d.id, d.assignment, d.status);
    let body = d
        .final_content_for_submission
        .as_deref()
        .or(d.user_edits.as_deref())
        .or(d.generated_content.as_deref())
        .unwrap_or("(no content yet)");
    println!("\n{body}");
    Ok(())
}

fn show_accepted(app: &App, accepted: &Accepted) -> Result<(), CliError> {
    if app.json {
        return print_json(accepted);
    }
    if accepted.message.is_empty() {
        println!("accepted");
    } else {
        println!("{}", accepted.message);
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
