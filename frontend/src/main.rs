use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::{RetryStrategy, TransactionStatus};
use tracing::{debug, info};

use payment_retry_dashboard::app::Dashboard;
use payment_retry_dashboard::components::tables::{
    error_codes_table, error_logs_table, payment_methods_table, retry_config_summary,
    summaries_table, transaction_detail, transactions_table, trend_table, users_table,
};
use payment_retry_dashboard::components::{pagination_footer, render_toast};
use payment_retry_dashboard::config::DashboardConfig;
use payment_retry_dashboard::router::{Navigation, Route};
use payment_retry_dashboard::services::api::ApiClient;
use payment_retry_dashboard::services::logging;
use payment_retry_dashboard::services::notifications::ToastVariant;
use payment_retry_dashboard::services::session_storage::FileSessionStorage;
use payment_retry_dashboard::views::admin_users::{delete_user, UserEditForm, UserListView};
use payment_retry_dashboard::views::auth::{LoginForm, RegisterForm};
use payment_retry_dashboard::views::dashboard::{AdminDashboardView, UserDashboardView};
use payment_retry_dashboard::views::error_logs::{ErrorLogFilters, ErrorLogView};
use payment_retry_dashboard::views::new_transaction::NewTransactionForm;
use payment_retry_dashboard::views::payment_methods::{
    delete_payment_method, load_payment_methods, PaymentMethodForm,
};
use payment_retry_dashboard::views::profile::ProfileForm;
use payment_retry_dashboard::views::retry_config::{strategy_description, GlobalRetryConfigView};
use payment_retry_dashboard::views::transaction_detail::TransactionDetailView;
use payment_retry_dashboard::views::transactions::{TransactionListView, TransactionScope};

/// Terminal dashboard for the payment retry system
#[derive(Debug, Parser)]
#[command(name = "payment-retry-dashboard", version)]
struct Cli {
    /// YAML config file (default: <config dir>/payment-retry-dashboard/config.yaml)
    #[arg(long, global = true, value_name = "path")]
    config: Option<PathBuf>,
    /// Override the API base URL
    #[arg(long = "api-url", global = true, value_name = "url")]
    api_url: Option<String>,
    /// Override where the session token is stored
    #[arg(long = "session-file", global = true, value_name = "path")]
    session_file: Option<PathBuf>,
    /// Debug logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show the dashboard for your role
    Dashboard,
    #[command(subcommand)]
    Transactions(TransactionCommand),
    #[command(subcommand, name = "payment-methods")]
    PaymentMethods(PaymentMethodCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Subcommand)]
enum TransactionCommand {
    /// List your transactions
    List {
        #[arg(long)]
        status: Option<TransactionStatus>,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    Show {
        id: i64,
    },
    /// Create a transaction
    New {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Defaults to your default payment method
        #[arg(long = "payment-method")]
        payment_method: Option<i64>,
        /// Do not let the server retry this transaction
        #[arg(long = "no-retry")]
        no_retry: bool,
    },
    /// Ask the server to retry a failed transaction
    Retry {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum PaymentMethodCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        details: String,
        #[arg(long, default_value = "1")]
        priority: String,
        #[arg(long = "default")]
        is_default: bool,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        details: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long = "default")]
        is_default: Option<bool>,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// List users
    Users {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Edit a user
    EditUser {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        enabled: Option<bool>,
    },
    DeleteUser {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List every user's transactions
    Transactions {
        #[arg(long)]
        status: Option<TransactionStatus>,
        #[arg(long = "user-id")]
        user_id: Option<i64>,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Show a transaction, optionally changing its retry configuration
    Transaction {
        id: i64,
        #[arg(long = "max-retries")]
        max_retries: Option<String>,
        /// Seconds
        #[arg(long)]
        interval: Option<String>,
        #[arg(long)]
        strategy: Option<RetryStrategy>,
    },
    /// Browse error logs
    ErrorLogs {
        #[arg(long)]
        code: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Show or change the global retry configuration
    RetryConfig {
        #[arg(long = "max-retries")]
        max_retries: Option<String>,
        /// Seconds
        #[arg(long)]
        interval: Option<String>,
        #[arg(long)]
        strategy: Option<RetryStrategy>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(path) = cli.session_file {
        config.session_file = Some(path);
    }
    config.validate()?;
    debug!(api = %config.api_base_url, "configuration loaded");

    let session = Arc::new(FileSessionStorage::new(config.session_path()));
    let api = ApiClient::from_config(&config, session).context("Failed to create API client")?;
    let mut dashboard = Dashboard::new(api);
    dashboard.bootstrap();

    let outcome = run(cli.command, &mut dashboard, &config).await;

    let mut reported = false;
    for toast in dashboard.toaster.drain() {
        match toast.variant {
            ToastVariant::Default => println!("{}", render_toast(&toast)),
            ToastVariant::Destructive => {
                reported = true;
                eprintln!("{}", render_toast(&toast));
            }
        }
    }

    if let Err(e) = outcome {
        if !reported {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
    Ok(())
}

/// Navigate to `route` and fail unless the guard lets it render
fn enter(dashboard: &mut Dashboard, route: Route) -> Result<()> {
    match dashboard.navigate(&route.path()) {
        Navigation::Render(_) => Ok(()),
        Navigation::Redirect(Route::Login) => {
            bail!("Not logged in. Run `payment-retry-dashboard login` first.")
        }
        Navigation::Redirect(other) | Navigation::Denied { redirect: other } => {
            bail!("{} is not available, redirected to {}", route, other)
        }
    }
}

/// Ask on the terminal before a destructive action
fn confirm(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    ask_yes_no(prompt, &mut stdin.lock(), &mut io::stdout()).context("Failed to read confirmation")
}

/// Anything but `y`/`yes` (including end of input) declines
fn ask_yes_no(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn view_error(message: String) -> anyhow::Error {
    anyhow!(message)
}

async fn run(command: Command, dashboard: &mut Dashboard, config: &DashboardConfig) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            enter(dashboard, Route::Login)?;
            let home = LoginForm::new(email, password)
                .submit(dashboard)
                .await
                .map_err(view_error)?;
            info!(%home, "login complete");
        }
        Command::Register {
            name,
            email,
            phone,
            password,
        } => {
            enter(dashboard, Route::Register)?;
            let form = RegisterForm {
                name,
                email,
                phone,
                password,
            };
            form.submit(dashboard).await.map_err(view_error)?;
        }
        Command::Logout => {
            dashboard.logout();
            println!("Logged out.");
        }
        Command::Whoami => match &dashboard.store.auth.user {
            Some(user) if dashboard.store.auth.is_authenticated => {
                println!("{} <{}> ({})", user.name, user.email, user.role.as_str());
            }
            _ => bail!("Not logged in."),
        },
        Command::Dashboard => {
            let home = dashboard.home();
            enter(dashboard, home)?;
            if home == Route::AdminDashboard {
                show_admin_dashboard(dashboard).await?;
            } else {
                show_user_dashboard(dashboard).await?;
            }
        }
        Command::Transactions(command) => run_transactions(command, dashboard, config).await?,
        Command::PaymentMethods(command) => run_payment_methods(command, dashboard).await?,
        Command::Profile(command) => run_profile(command, dashboard).await?,
        Command::Admin(command) => run_admin(command, dashboard, config).await?,
    }
    Ok(())
}

async fn show_user_dashboard(dashboard: &mut Dashboard) -> Result<()> {
    UserDashboardView::load(dashboard).await.map_err(view_error)?;
    let counts = UserDashboardView::status_counts(dashboard);
    println!(
        "Successful: {}  Failed: {}  Pending: {}  Retrying: {}",
        counts.successful, counts.failed, counts.pending, counts.retrying
    );
    println!();
    println!("Recent transactions");
    println!("{}", summaries_table(&dashboard.store.analytics.transaction_summaries));
    println!();
    println!("Payment methods");
    println!("{}", payment_methods_table(&dashboard.store.payment_methods.payment_methods));
    Ok(())
}

async fn show_admin_dashboard(dashboard: &mut Dashboard) -> Result<()> {
    let loaded = AdminDashboardView::load(dashboard).await;
    let analytics = &dashboard.store.analytics;
    println!(
        "Transactions (7 days): {}",
        AdminDashboardView::trend_total(dashboard)
    );
    println!(
        "Retry success rate: {:.2}%",
        analytics.retry_success_rate.unwrap_or_default()
    );
    println!(
        "Average attempts to success: {:.1}",
        analytics.average_retry_attempts.unwrap_or_default()
    );
    println!();
    println!("{}", trend_table(&analytics.transaction_trend));
    println!();
    println!("Most common errors");
    println!("{}", error_codes_table(&analytics.common_error_codes));
    println!();
    println!("Latest transactions");
    println!("{}", transactions_table(&dashboard.store.transactions.transactions));
    loaded.map_err(view_error)
}

async fn run_transactions(
    command: TransactionCommand,
    dashboard: &mut Dashboard,
    config: &DashboardConfig,
) -> Result<()> {
    match command {
        TransactionCommand::List { status, page } => {
            enter(dashboard, Route::UserTransactions)?;
            let mut view =
                TransactionListView::new(TransactionScope::Own).with_page_size(config.page_size);
            view.status_filter = status;
            view.page = page;
            view.load(dashboard).await.map_err(view_error)?;
            println!("{}", transactions_table(&dashboard.store.transactions.transactions));
            println!("{}", pagination_footer(&dashboard.store.transactions.pagination));
        }
        TransactionCommand::Show { id } => {
            let route = Route::UserTransactionDetail(id);
            enter(dashboard, route)?;
            show_transaction(dashboard, route).await?;
        }
        TransactionCommand::New {
            amount,
            currency,
            payment_method,
            no_retry,
        } => {
            enter(dashboard, Route::NewTransaction)?;
            let mut form = NewTransactionForm {
                amount,
                currency,
                payment_method_id: payment_method,
                allow_retry: !no_retry,
            };
            form.prepare(dashboard).await.map_err(view_error)?;
            let route = form.submit(dashboard).await.map_err(view_error)?;
            show_transaction(dashboard, route).await?;
        }
        TransactionCommand::Retry { id } => {
            let route = Route::UserTransactionDetail(id);
            enter(dashboard, route)?;
            let mut view = TransactionDetailView::new(id, false);
            view.load(dashboard).await.map_err(view_error)?;
            view.retry(dashboard).await.map_err(view_error)?;
            if let Some(transaction) = view.transaction(dashboard) {
                println!("{}", transaction_detail(transaction));
            }
        }
    }
    Ok(())
}

async fn show_transaction(dashboard: &mut Dashboard, route: Route) -> Result<()> {
    let mut view = TransactionDetailView::for_route(route)
        .ok_or_else(|| anyhow!("{} is not a transaction page", route))?;
    let transaction = view.load(dashboard).await.map_err(view_error)?;
    println!("{}", transaction_detail(&transaction));
    if view.can_retry(dashboard) {
        println!();
        println!("This transaction failed and can be retried.");
    }
    Ok(())
}

async fn run_payment_methods(command: PaymentMethodCommand, dashboard: &mut Dashboard) -> Result<()> {
    enter(dashboard, Route::PaymentMethods)?;
    match command {
        PaymentMethodCommand::List => {
            load_payment_methods(dashboard).await.map_err(view_error)?;
        }
        PaymentMethodCommand::Add {
            name,
            details,
            priority,
            is_default,
        } => {
            let form = PaymentMethodForm {
                editing_id: None,
                method_name: name,
                details,
                priority,
                is_default,
            };
            form.submit(dashboard).await.map_err(view_error)?;
        }
        PaymentMethodCommand::Update {
            id,
            name,
            details,
            priority,
            is_default,
        } => {
            let current = dashboard
                .store
                .payment_methods
                .fetch_payment_method_by_id(&dashboard.api, id)
                .await
                .map_err(view_error)?;
            let mut form = PaymentMethodForm::edit(&current);
            if let Some(name) = name {
                form.method_name = name;
            }
            if let Some(details) = details {
                form.details = details;
            }
            if let Some(priority) = priority {
                form.priority = priority;
            }
            if let Some(is_default) = is_default {
                form.is_default = is_default;
            }
            form.submit(dashboard).await.map_err(view_error)?;
        }
        PaymentMethodCommand::Delete { id, yes } => {
            let prompt = format!("Delete payment method {}?", id);
            if yes || confirm(&prompt)? {
                delete_payment_method(dashboard, id).await.map_err(view_error)?;
            } else {
                println!("Cancelled.");
            }
        }
    }
    load_payment_methods(dashboard).await.map_err(view_error)?;
    println!("{}", payment_methods_table(&dashboard.store.payment_methods.payment_methods));
    Ok(())
}

async fn run_profile(command: ProfileCommand, dashboard: &mut Dashboard) -> Result<()> {
    enter(dashboard, Route::Profile)?;
    let mut form = ProfileForm::load(dashboard).await.map_err(view_error)?;
    if let ProfileCommand::Update { name, email, phone } = command {
        if let Some(name) = name {
            form.name = name;
        }
        if let Some(email) = email {
            form.email = email;
        }
        if let Some(phone) = phone {
            form.phone = phone;
        }
        form.submit(dashboard).await.map_err(view_error)?;
    }
    if let Some(user) = &dashboard.store.users.current_user {
        println!("Name:  {}", user.name);
        println!("Email: {}", user.email);
        println!("Phone: {}", user.phone);
        println!("Role:  {}", user.role.as_str());
    }
    Ok(())
}

async fn run_admin(command: AdminCommand, dashboard: &mut Dashboard, config: &DashboardConfig) -> Result<()> {
    match command {
        AdminCommand::Users { page } => {
            enter(dashboard, Route::AdminUsers)?;
            let view = UserListView {
                page,
                size: config.page_size,
            };
            view.load(dashboard).await.map_err(view_error)?;
            println!("{}", users_table(&dashboard.store.users.users));
            println!("{}", pagination_footer(&dashboard.store.users.pagination));
        }
        AdminCommand::EditUser {
            id,
            name,
            email,
            phone,
            enabled,
        } => {
            enter(dashboard, Route::AdminUsers)?;
            let user = dashboard
                .store
                .users
                .fetch_user_by_id(&dashboard.api, id)
                .await
                .map_err(view_error)?;
            let mut form = UserEditForm::from_user(&user)
                .ok_or_else(|| anyhow!("User {} has no id in the response", id))?;
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(email) = email {
                form.email = email;
            }
            if let Some(phone) = phone {
                form.phone = phone;
            }
            if let Some(enabled) = enabled {
                form.enabled = enabled;
            }
            let updated = form.submit(dashboard).await.map_err(view_error)?;
            println!("{}", users_table(std::slice::from_ref(&updated)));
        }
        AdminCommand::DeleteUser { id, yes } => {
            enter(dashboard, Route::AdminUsers)?;
            let prompt = format!("Delete user {}? This cannot be undone.", id);
            if yes || confirm(&prompt)? {
                delete_user(dashboard, id).await.map_err(view_error)?;
            } else {
                println!("Cancelled.");
            }
        }
        AdminCommand::Transactions {
            status,
            user_id,
            page,
        } => {
            enter(dashboard, Route::AdminTransactions)?;
            let mut view =
                TransactionListView::new(TransactionScope::All).with_page_size(config.page_size);
            view.status_filter = status;
            view.user_id_filter = user_id;
            view.page = page;
            view.load(dashboard).await.map_err(view_error)?;
            println!("{}", transactions_table(&dashboard.store.transactions.transactions));
            println!("{}", pagination_footer(&dashboard.store.transactions.pagination));
        }
        AdminCommand::Transaction {
            id,
            max_retries,
            interval,
            strategy,
        } => {
            let route = Route::AdminTransactionDetail(id);
            enter(dashboard, route)?;
            if max_retries.is_some() || interval.is_some() || strategy.is_some() {
                let mut view = TransactionDetailView::new(id, true);
                view.load(dashboard).await.map_err(view_error)?;
                if let Some(max_retries) = max_retries {
                    view.retry_form.max_retries = max_retries;
                }
                if let Some(interval) = interval {
                    view.retry_form.retry_interval = interval;
                }
                if let Some(strategy) = strategy {
                    view.retry_form.strategy = strategy;
                }
                view.save_retry_config(dashboard).await.map_err(view_error)?;
            }
            show_transaction(dashboard, route).await?;
        }
        AdminCommand::ErrorLogs {
            code,
            from,
            to,
            page,
        } => {
            enter(dashboard, Route::AdminErrorLogs)?;
            let mut view = ErrorLogView {
                size: config.page_size,
                ..ErrorLogView::default()
            };
            let filters = ErrorLogFilters {
                error_code: code.unwrap_or_default(),
                start_date: from.unwrap_or_default(),
                end_date: to.unwrap_or_default(),
            };
            view.apply_filters(dashboard, filters).await.map_err(view_error)?;
            if page > 0 {
                view.go_to_page(dashboard, page).await.map_err(view_error)?;
            }
            let logs = &dashboard.store.error_logs;
            println!("{}", error_logs_table(&logs.error_logs));
            println!("{}", pagination_footer(&logs.pagination));
            println!();
            println!("Most common error codes");
            println!("{}", error_codes_table(&logs.common_error_codes));
        }
        AdminCommand::RetryConfig {
            max_retries,
            interval,
            strategy,
        } => {
            enter(dashboard, Route::AdminRetryConfig)?;
            let mut view = GlobalRetryConfigView::default();
            let mut current = view.load(dashboard).await.map_err(view_error)?;
            if max_retries.is_some() || interval.is_some() || strategy.is_some() {
                if let Some(max_retries) = max_retries {
                    view.form.max_retries = max_retries;
                }
                if let Some(interval) = interval {
                    view.form.retry_interval = interval;
                }
                if let Some(strategy) = strategy {
                    view.form.strategy = strategy;
                }
                current = view.save(dashboard).await.map_err(view_error)?;
            }
            println!("{}", retry_config_summary(&current));
            println!();
            println!("{}", strategy_description(current.strategy));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let accepted = ask_yes_no("Delete user 7?", &mut Cursor::new(input), &mut output).unwrap();
        (accepted, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_delete_needs_explicit_yes() {
        assert_eq!(answer("y\n"), (true, "Delete user 7? [y/N] ".to_string()));
        assert!(answer(" YES \n").0);
        assert!(!answer("\n").0);
        assert!(!answer("no\n").0);
        assert!(!answer("").0);
    }

    #[test]
    fn test_delete_flags_parse() {
        let cli = Cli::try_parse_from(["payment-retry-dashboard", "admin", "delete-user", "7", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Admin(AdminCommand::DeleteUser { id: 7, yes: true })));

        let cli = Cli::try_parse_from(["payment-retry-dashboard", "payment-methods", "delete", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::PaymentMethods(PaymentMethodCommand::Delete { id: 3, yes: false })
        ));
    }
}
