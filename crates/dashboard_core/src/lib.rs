//! Client-side state and orchestration for the admin dashboard.
//!
//! `DashboardController` keeps an in-memory order list in sync with the
//! content store: a reload replaces the list wholesale, each confirmed
//! mutation patches exactly one entry, and any store failure leaves local
//! state untouched so the view stays stale-but-available.

pub mod events;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use content_store::OrderStore;
use shared::domain::{Order, OrderId, OrderStatus, StatusFilter};
use tokio::sync::broadcast;
use tracing::{error, warn};

use events::{UiError, UiErrorContext, UiEvent};

/// Asks the operator before a destructive action runs.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm_delete(&self, order_id: &OrderId) -> bool;
}

/// Prompt that approves everything, for callers that already collected
/// consent (e.g. a `--yes` flag).
pub struct PreApproved;

#[async_trait]
impl ConfirmationPrompt for PreApproved {
    async fn confirm_delete(&self, _order_id: &OrderId) -> bool {
        true
    }
}

pub struct DashboardController {
    store: Arc<dyn OrderStore>,
    confirm: Arc<dyn ConfirmationPrompt>,
    events: broadcast::Sender<UiEvent>,
    orders: Vec<Order>,
    filter: StatusFilter,
    expanded_order: Option<OrderId>,
}

impl DashboardController {
    pub fn new(store: Arc<dyn OrderStore>, confirm: Arc<dyn ConfirmationPrompt>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            store,
            confirm,
            events,
            orders: Vec::new(),
            filter: StatusFilter::default(),
            expanded_order: None,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Read-all from the store. Success replaces the local list wholesale;
    /// failure keeps the stale list so the view survives store outages.
    pub async fn load_orders(&mut self) {
        match self.store.fetch_orders().await {
            Ok(orders) => {
                let count = orders.len();
                self.orders = orders;
                if self
                    .expanded_order
                    .as_ref()
                    .is_some_and(|id| !contains(&self.orders, id))
                {
                    self.expanded_order = None;
                }
                let _ = self.events.send(UiEvent::OrdersLoaded { count });
            }
            Err(err) => {
                error!(error = %err, "failed to fetch orders; keeping stale list");
                self.notify_failure(UiErrorContext::LoadOrders, &err);
            }
        }
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == *order_id)
    }

    /// Pure local transform: no persistence, no network call. `All` yields
    /// the full list unchanged in order.
    pub fn visible_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| self.filter.matches(order))
            .collect()
    }

    /// Single-field patch against the store; local state is only touched
    /// after the store confirms, so failures need no rollback.
    pub async fn update_status(&mut self, order_id: &OrderId, status: OrderStatus) {
        match self.store.set_order_status(order_id, status).await {
            Ok(()) => {
                if let Some(order) = self.orders.iter_mut().find(|order| order.id == *order_id) {
                    order.status = Some(status);
                }
                let _ = self.events.send(UiEvent::StatusUpdated {
                    order_id: order_id.clone(),
                    status,
                });
            }
            Err(err) => {
                error!(order_id = %order_id, error = %err, "failed to update order status");
                self.notify_failure(UiErrorContext::UpdateStatus, &err);
            }
        }
    }

    /// Confirmed delete-by-identifier. A declined prompt returns silently
    /// without touching the store.
    pub async fn delete_order(&mut self, order_id: &OrderId) {
        if !self.confirm.confirm_delete(order_id).await {
            return;
        }
        match self.store.delete_order(order_id).await {
            Ok(_result) => {
                self.orders.retain(|order| order.id != *order_id);
                if self.expanded_order.as_ref() == Some(order_id) {
                    self.expanded_order = None;
                }
                let _ = self.events.send(UiEvent::OrderDeleted {
                    order_id: order_id.clone(),
                });
            }
            Err(err) => {
                error!(order_id = %order_id, error = %err, "failed to delete order");
                self.notify_failure(UiErrorContext::DeleteOrder, &err);
            }
        }
    }

    /// Explicit expanded-row state: toggles off when the same row is
    /// expanded, expands only identifiers present in the local list.
    pub fn toggle_details(&mut self, order_id: &OrderId) {
        if self.expanded_order.as_ref() == Some(order_id) {
            self.expanded_order = None;
        } else if contains(&self.orders, order_id) {
            self.expanded_order = Some(order_id.clone());
        } else {
            warn!(order_id = %order_id, "ignoring detail toggle for unknown order");
        }
    }

    pub fn expanded_order(&self) -> Option<&OrderId> {
        self.expanded_order.as_ref()
    }

    fn notify_failure(&self, context: UiErrorContext, err: &anyhow::Error) {
        let _ = self
            .events
            .send(UiEvent::Error(UiError::from_message(context, err.to_string())));
    }
}

fn contains(orders: &[Order], order_id: &OrderId) -> bool {
    orders.iter().any(|order| order.id == *order_id)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
