use std::{io, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use clap::{Parser, Subcommand};
use content_store::{ContentStoreClient, StoreConfig};
use dashboard_core::{
    events::UiEvent,
    session::{AdminCredentials, LoginGate, SessionStore},
    ConfirmationPrompt, DashboardController, PreApproved,
};
use shared::domain::{Order, OrderId, OrderStatus, StatusFilter};
use tokio::sync::broadcast;

#[derive(Parser, Debug)]
#[command(name = "admin", about = "Storefront order administration")]
struct Args {
    /// Session flag file; defaults to the platform data directory.
    #[arg(long)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with the admin credential pair.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the persisted login flag.
    Logout,
    /// Order operations; require a signed-in session.
    #[command(subcommand)]
    Orders(OrdersCommand),
}

#[derive(Subcommand, Debug)]
enum OrdersCommand {
    /// List orders, optionally filtered by status.
    List {
        /// all, pending, dispatch or success
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Show one order with its cart line items.
    Show { order_id: String },
    /// Change the status of one order.
    SetStatus { order_id: String, status: String },
    /// Delete an order after confirmation.
    Delete {
        order_id: String,
        /// Skip the interactive confirmation.
        #[arg(long)]
        yes: bool,
    },
}

/// Interactive y/N gate for destructive actions.
struct StdinConfirm;

#[async_trait]
impl ConfirmationPrompt for StdinConfirm {
    async fn confirm_delete(&self, order_id: &OrderId) -> bool {
        println!("Delete order {order_id}? You won't be able to revert this. [y/N]");
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let session = SessionStore::new(
        args.session_file
            .unwrap_or_else(SessionStore::default_path),
    );
    let gate = LoginGate::new(AdminCredentials::from_env(), session);

    match args.command {
        Command::Login { email, password } => {
            if gate.login(&email, &password)? {
                println!("Signed in.");
            } else {
                eprintln!("Invalid email or password");
                std::process::exit(1);
            }
        }
        Command::Logout => {
            gate.logout()?;
            println!("Signed out.");
        }
        Command::Orders(command) => run_orders(command, &gate).await?,
    }

    Ok(())
}

async fn run_orders(command: OrdersCommand, gate: &LoginGate) -> Result<()> {
    if !gate.is_logged_in() {
        bail!("not signed in; run `admin login` first");
    }

    let store = ContentStoreClient::new(StoreConfig::from_env()?);
    let confirm: Arc<dyn ConfirmationPrompt> = match &command {
        OrdersCommand::Delete { yes: true, .. } => Arc::new(PreApproved),
        _ => Arc::new(StdinConfirm),
    };
    let mut controller = DashboardController::new(Arc::new(store), confirm);
    let mut events = controller.subscribe_events();

    controller.load_orders().await;
    if any_error(&render_notifications(&mut events)) {
        bail!("failed to load orders from the content store");
    }

    match command {
        OrdersCommand::List { status } => {
            let filter = StatusFilter::parse(&status)
                .context("status must be one of all, pending, dispatch, success")?;
            controller.set_filter(filter);
            render_orders_table(&controller.visible_orders());
        }
        OrdersCommand::Show { order_id } => {
            let order_id = OrderId(order_id);
            controller.toggle_details(&order_id);
            if controller.expanded_order().is_none() {
                bail!("no such order: {order_id}");
            }
            if let Some(order) = controller.order(&order_id) {
                render_order_details(order);
            }
        }
        OrdersCommand::SetStatus { order_id, status } => {
            let status = OrderStatus::parse(&status)
                .context("status must be one of pending, dispatch, success")?;
            let order_id = OrderId(order_id);
            controller.update_status(&order_id, status).await;
            if any_error(&render_notifications(&mut events)) {
                bail!("status update failed");
            }
            // Render the reconciled row from local state; no refetch.
            if let Some(order) = controller.order(&order_id) {
                render_orders_table(&[order]);
            }
        }
        OrdersCommand::Delete { order_id, .. } => {
            let order_id = OrderId(order_id);
            controller.delete_order(&order_id).await;
            let seen = render_notifications(&mut events);
            if any_error(&seen) {
                bail!("delete failed");
            }
            if !seen
                .iter()
                .any(|event| matches!(event, UiEvent::OrderDeleted { .. }))
            {
                println!("Delete cancelled.");
            }
        }
    }

    Ok(())
}

/// Prints user-facing notifications for every pending controller event and
/// returns them for flow-control checks.
fn render_notifications(rx: &mut broadcast::Receiver<UiEvent>) -> Vec<UiEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match &event {
            UiEvent::OrdersLoaded { count } => {
                tracing::debug!(count, "orders loaded");
            }
            UiEvent::StatusUpdated { order_id, status } => {
                println!("Updated! Order {order_id} status changed to {status}.");
            }
            UiEvent::OrderDeleted { order_id } => {
                println!("Deleted! Order {order_id} has been deleted.");
            }
            UiEvent::Error(err) => {
                eprintln!("Error: {}", err.message());
                if err.requires_reauth() {
                    eprintln!(
                        "The store token may lack write/delete permission; \
                         check CONTENT_STORE_API_TOKEN."
                    );
                }
            }
        }
        seen.push(event);
    }
    seen
}

fn any_error(events: &[UiEvent]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, UiEvent::Error(_)))
}

fn render_orders_table(orders: &[&Order]) {
    if orders.is_empty() {
        println!("No orders.");
        return;
    }
    println!(
        "{:<24} {:<24} {:<28} {:<12} {:>10} {:<10}",
        "ID", "Customer", "Address", "Date", "Total", "Status"
    );
    for order in orders {
        println!(
            "{:<24} {:<24} {:<28} {:<12} {:>10} {:<10}",
            order.id.as_str(),
            order.customer_name(),
            order.address,
            format_order_date(&order.order_date),
            format!("${:.2}", order.total),
            order.status.map(|status| status.label()).unwrap_or("-"),
        );
    }
}

fn render_order_details(order: &Order) {
    println!("Order {}", order.id);
    println!(
        "  Customer: {} <{}> {}",
        order.customer_name(),
        order.email,
        order.phone
    );
    println!(
        "  Ship to:  {}, {} {}",
        order.address, order.city, order.zip_code
    );
    println!("  Date:     {}", format_order_date(&order.order_date));
    println!(
        "  Total:    ${:.2} (discount ${:.2})",
        order.total, order.discount
    );
    println!(
        "  Status:   {}",
        order.status.map(|status| status.label()).unwrap_or("-")
    );
    println!("  Items:");
    for item in &order.cart_items {
        println!("    - {} ({})", item.product_name, item.image);
    }
}

fn format_order_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
