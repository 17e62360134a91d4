use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appointment_cell::models::{Appointment, AppointmentStatus, BookAppointmentRequest};
use appointment_cell::services::lifecycle::AppointmentLifecycleService;
use appointment_cell::services::remote::AppointmentService;
use auth_cell::models::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use auth_cell::services::auth::AuthService;
use auth_cell::services::directory::DirectoryService;
use session_cell::SessionContext;
use shared_config::ApiConfig;
use shared_gateway::HospitalClient;
use shared_models::{User, UserRole};

/// Terminal front end for the hospital appointment service.
#[derive(Parser)]
#[command(name = "hospital-cli", version, about)]
struct Cli {
    /// Account email, required for authenticated commands
    #[arg(long, global = true)]
    email: Option<String>,

    /// Account password, required for authenticated commands
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and print the issued token
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, value_enum, default_value = "patient")]
        role: Role,
        #[arg(long)]
        specialization: Option<String>,
    },
    /// Authenticate and print the issued token
    Login,
    /// List available doctors
    Doctors,
    /// List registered patients
    Patients,
    /// List your appointments
    Appointments,
    /// Book a new appointment (starts pending)
    Book {
        #[arg(long)]
        doctor_id: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        time: String,
        #[arg(long)]
        reason: String,
    },
    /// Approve a pending appointment (assigned doctor only)
    Approve {
        appointment_id: String,
    },
    /// Reject a pending appointment (assigned doctor only)
    Reject {
        appointment_id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Cancel an appointment
    Cancel {
        appointment_id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Update your profile
    UpdateProfile {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        specialization: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Role {
    Patient,
    Doctor,
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Patient => UserRole::Patient,
            Role::Doctor => UserRole::Doctor,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let email = cli.email.clone();
    let password = cli.password.clone();

    let config = ApiConfig::from_env();
    let gateway = Arc::new(HospitalClient::new(&config));
    info!("Using API at {}", gateway.get_base_url());

    match cli.command {
        Command::Register {
            username,
            email,
            password,
            full_name,
            phone,
            role,
            specialization,
        } => {
            let auth = AuthService::new(Arc::clone(&gateway));
            let response = auth
                .register(RegisterRequest {
                    username,
                    email,
                    password,
                    full_name,
                    phone,
                    role: role.into(),
                    specialization,
                })
                .await?;
            println!(
                "Registered {} ({})",
                response.user.full_name, response.user.role
            );
            println!("Token: {}", response.token);
        }
        Command::Login => {
            let session = authenticate(&email, &password, &gateway).await?;
            let current = session.current().ok_or_else(|| anyhow!("Login failed"))?;
            println!(
                "Logged in as {} ({})",
                current.user.full_name, current.user.role
            );
            println!("Token: {}", current.token);
        }
        Command::Doctors => {
            let directory = DirectoryService::new(Arc::clone(&gateway));
            for doctor in directory.fetch_doctors().await? {
                print_user(&doctor);
            }
        }
        Command::Patients => {
            let directory = DirectoryService::new(Arc::clone(&gateway));
            for patient in directory.fetch_patients().await? {
                print_user(&patient);
            }
        }
        Command::Appointments => {
            let session = authenticate(&email, &password, &gateway).await?;
            let appointments = list_appointments(&session, &gateway).await?;
            print_appointments(&appointments);
        }
        Command::Book {
            doctor_id,
            date,
            time,
            reason,
        } => {
            let session = authenticate(&email, &password, &gateway).await?;
            let current = session.current().ok_or_else(|| anyhow!("Not logged in"))?;

            let service = AppointmentService::new(Arc::clone(&gateway));
            let appointment = service
                .book(
                    BookAppointmentRequest {
                        patient_id: current.user.id.clone(),
                        doctor_id,
                        appointment_date: date,
                        appointment_time: time,
                        reason,
                    },
                    &current.token,
                )
                .await?;
            println!(
                "Booked appointment {} with {} on {} at {} ({})",
                appointment.id,
                appointment.doctor.full_name,
                appointment.appointment_date.format("%Y-%m-%d"),
                appointment.appointment_time,
                appointment.status
            );
        }
        Command::Approve { appointment_id } => {
            transition(
                &email,
                &password,
                &gateway,
                &appointment_id,
                AppointmentStatus::Confirmed,
                None,
            )
            .await?;
        }
        Command::Reject {
            appointment_id,
            reason,
        }
        | Command::Cancel {
            appointment_id,
            reason,
        } => {
            transition(
                &email,
                &password,
                &gateway,
                &appointment_id,
                AppointmentStatus::Cancelled,
                reason,
            )
            .await?;
        }
        Command::UpdateProfile {
            full_name,
            phone,
            specialization,
            bio,
        } => {
            let session = authenticate(&email, &password, &gateway).await?;
            let current = session.current().ok_or_else(|| anyhow!("Not logged in"))?;

            let directory = DirectoryService::new(Arc::clone(&gateway));
            let user = directory
                .update_profile(
                    &current.user.id,
                    UpdateProfileRequest {
                        full_name,
                        phone,
                        specialization,
                        bio,
                    },
                    &current.token,
                )
                .await?;
            println!("Profile updated for {}", user.full_name);
        }
    }

    Ok(())
}

/// Log in with the global credentials and seed a fresh session context.
async fn authenticate(
    email: &Option<String>,
    password: &Option<String>,
    gateway: &Arc<HospitalClient>,
) -> Result<SessionContext> {
    let email = email
        .clone()
        .context("--email is required for this command")?;
    let password = password
        .clone()
        .context("--password is required for this command")?;

    let auth = AuthService::new(Arc::clone(gateway));
    let response = auth.login(LoginRequest { email, password }).await?;

    let session = SessionContext::new();
    session.login(response.user, response.token);
    Ok(session)
}

async fn list_appointments(
    session: &SessionContext,
    gateway: &Arc<HospitalClient>,
) -> Result<Vec<Appointment>> {
    let current = session.current().ok_or_else(|| anyhow!("Not logged in"))?;
    let service = AppointmentService::new(Arc::clone(gateway));
    let appointments = service
        .fetch_appointments(&current.user.id, current.user.role, &current.token)
        .await?;
    Ok(appointments)
}

/// Run one lifecycle transition: fetch, ask the engine, execute, re-fetch.
/// The re-fetch replaces local state entirely; nothing is patched in place.
async fn transition(
    email: &Option<String>,
    password: &Option<String>,
    gateway: &Arc<HospitalClient>,
    appointment_id: &str,
    target: AppointmentStatus,
    reason: Option<String>,
) -> Result<()> {
    let session = authenticate(email, password, gateway).await?;
    let current = session.current().ok_or_else(|| anyhow!("Not logged in"))?;

    let appointments = list_appointments(&session, gateway).await?;
    let appointment = appointments
        .iter()
        .find(|a| a.id == appointment_id)
        .ok_or_else(|| anyhow!("Appointment {} not found", appointment_id))?;

    let engine = AppointmentLifecycleService::new();
    let record = engine.apply_transition(appointment, target, &current.user, reason)?;

    let service = AppointmentService::new(Arc::clone(gateway));
    service.execute_transition(&record, &current.token).await?;
    println!(
        "Appointment {} is now {}",
        record.appointment_id, record.to_status
    );

    let refreshed = list_appointments(&session, gateway).await?;
    print_appointments(&refreshed);
    Ok(())
}

fn print_user(user: &User) {
    let specialization = user
        .specialization
        .as_deref()
        .map(|s| format!(" - {}", s))
        .unwrap_or_default();
    println!(
        "{}  {}{}  <{}>  {}",
        user.id, user.full_name, specialization, user.email, user.phone
    );
}

fn print_appointments(appointments: &[Appointment]) {
    if appointments.is_empty() {
        println!("No appointments scheduled");
        return;
    }
    for apt in appointments {
        println!(
            "{}  {}  {} at {}  patient: {}  doctor: {}  [{}]",
            apt.id,
            apt.reason,
            apt.appointment_date.format("%Y-%m-%d"),
            apt.appointment_time,
            apt.patient.full_name,
            apt.doctor.full_name,
            apt.status
        );
    }
}
