use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use studiobook::api::{ClassBookingRequest, ContactMessage, HttpStudioApi, StudioApi};
use studiobook::config::PortalConfig;
use studiobook::db::{self, queries};
use studiobook::models::{MembershipPackage, PaymentMethod};
use studiobook::services::booking::book_class;
use studiobook::services::classify::classify;
use studiobook::services::correlation::CorrelationTracker;
use studiobook::services::membership::MembershipFlow;
use studiobook::services::normalize::normalize_bookings;
use studiobook::state::PortalState;

#[derive(Parser)]
#[command(name = "studiobook", about = "Studio Reform booking portal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the class schedule
    Classes,
    /// Book a class
    Book {
        class_id: i64,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long, default_value_t = 800.0)]
        amount: f64,
    },
    /// Show your bookings
    Bookings {
        /// One of: upcoming, past, memberships, pending, all
        #[arg(long, default_value = "all")]
        view: String,
    },
    /// List membership packages
    Packages,
    /// Membership purchase flow
    Membership {
        #[command(subcommand)]
        action: MembershipAction,
    },
    /// Send a message to the studio
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        message: String,
    },
    /// Ask the studio chatbot
    Chat { message: String },
    /// Admin operations
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum MembershipAction {
    /// Where the flow currently stands
    Status,
    /// Choose a package and payment method (creates the booking)
    Pay {
        package: String,
        method: String,
    },
    /// Confirm the manual payment was made
    Confirm,
    /// Show the payment receipt
    Receipt,
    /// Abandon the flow
    Reset,
}

#[derive(Subcommand)]
enum AdminAction {
    Members,
    Bookings,
    SetStatus { booking_id: i64, status: String },
    Approve { booking_id: i64 },
    Reject { booking_id: i64 },
    DeleteClass { class_id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = PortalConfig::from_env();
    let conn = db::init_db(&config.session_db)?;
    let api = HttpStudioApi::new(&config.api_base_url, &config.auth_token);
    let state = PortalState::new(conn, config, Box::new(api));

    match run(&state, cli.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

async fn run(state: &PortalState, command: Command) -> anyhow::Result<()> {
    let tracker = CorrelationTracker::new(state.db.clone());
    let currency = state.config.currency.clone();

    match command {
        Command::Classes => {
            for class in state.api.list_classes().await? {
                println!(
                    "{:>3}  {}  with {}  {}  {currency}{:.0}",
                    class.id, class.name, class.instructor, class.schedule, class.price
                );
            }
        }

        Command::Book {
            class_id,
            date,
            time,
            amount,
        } => {
            let req = ClassBookingRequest {
                class_id,
                booking_date: date,
                booking_time: time,
                amount,
            };
            let outcome = book_class(state.api.as_ref(), &tracker, &req).await?;
            state.set_nav(outcome.nav.clone());
            println!(
                "Booked. Reference {} (booking #{})",
                outcome.reference_number, outcome.booking_id
            );
            println!("You can now purchase a package: studiobook membership pay <package> <method>");
        }

        Command::Bookings { view } => {
            let raw = state.api.list_bookings().await?;
            let records = normalize_bookings(&raw);
            let views = classify(chrono::Utc::now().naive_utc(), &records);
            let selected = match view.as_str() {
                "upcoming" => &views.upcoming,
                "past" => &views.past,
                "memberships" => &views.active_memberships,
                "pending" => &views.pending_approval,
                _ => &views.all,
            };
            if selected.is_empty() {
                println!("No bookings to show.");
            }
            for r in selected {
                println!(
                    "{}  {}  {}  {}  [{}]  {currency}{:.0}",
                    r.id,
                    r.name,
                    r.date_display,
                    r.time_display,
                    r.status.as_str(),
                    r.amount
                );
            }
        }

        Command::Packages => {
            for p in MembershipPackage::catalog() {
                let sessions = match p.sessions {
                    Some(n) => format!("{n} sessions"),
                    None => "unlimited".to_string(),
                };
                println!("{:<18} {:<10} {currency}{:.0}  {}", p.id, sessions, p.price, p.description);
            }
        }

        Command::Membership { action } => {
            let nav = state.take_nav();
            let mut flow = MembershipFlow::load(state.api.as_ref(), &tracker, nav.as_ref())?;
            match action {
                MembershipAction::Status => {
                    println!("stage: {:?}", flow.stage());
                    if let Some(reference) = flow.display_reference() {
                        println!("reference: {reference}");
                    }
                    if let Some(p) = flow.selected_package() {
                        println!("package: {} ({currency}{:.0})", p.name, p.price);
                    }
                }
                MembershipAction::Pay { package, method } => {
                    let method = PaymentMethod::parse(&method)
                        .ok_or_else(|| anyhow::anyhow!("unknown payment method: {method}"))?;
                    flow.select_package(&package)?;
                    let booking_id = flow.select_payment_method(method).await?;
                    println!("Membership booking #{booking_id} created.");
                    if flow.reference_mismatch() {
                        println!("Note: quote your class reference when paying.");
                    }
                    let receipt = flow.receipt()?;
                    println!(
                        "{}  {currency}{:.0}  reference {}",
                        receipt.package_name, receipt.amount, receipt.reference
                    );
                    println!("{}", receipt.instructions);
                }
                MembershipAction::Confirm => {
                    flow.confirm_payment().await?;
                    println!("Payment recorded. The studio will confirm your membership shortly.");
                }
                MembershipAction::Receipt => {
                    let receipt = flow.receipt()?;
                    println!(
                        "{} via {}  {currency}{:.0}  reference {}",
                        receipt.package_name, receipt.payment_method, receipt.amount, receipt.reference
                    );
                    println!("{}", receipt.instructions);
                }
                MembershipAction::Reset => {
                    flow.reset()?;
                    println!("Membership flow cleared.");
                }
            }
        }

        Command::Contact { name, email, message } => {
            state
                .api
                .submit_contact(&ContactMessage { name, email, message })
                .await?;
            println!("Message sent.");
        }

        Command::Chat { message } => {
            let session_id = {
                let conn = state
                    .db
                    .lock()
                    .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
                queries::chat_session_id(&conn)?
            };
            let reply = state.api.chatbot(&message, &session_id).await?;
            println!("{reply}");
        }

        Command::Admin { action } => match action {
            AdminAction::Members => {
                for member in state.api.admin_members().await? {
                    println!("{member}");
                }
            }
            AdminAction::Bookings => {
                for booking in state.api.admin_bookings().await? {
                    println!("{booking}");
                }
            }
            AdminAction::SetStatus { booking_id, status } => {
                state.api.admin_update_booking_status(booking_id, &status).await?;
                println!("Booking #{booking_id} set to {status}.");
            }
            AdminAction::Approve { booking_id } => {
                state.api.admin_approve_membership(booking_id).await?;
                println!("Membership #{booking_id} approved.");
            }
            AdminAction::Reject { booking_id } => {
                state.api.admin_reject_membership(booking_id).await?;
                println!("Membership #{booking_id} rejected.");
            }
            AdminAction::DeleteClass { class_id } => {
                state.api.admin_delete_class(class_id).await?;
                println!("Class #{class_id} deleted.");
            }
        },
    }

    Ok(())
}
