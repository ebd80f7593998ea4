use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    ContributionPaidEvent,
    EventHandler,
    EventProducer,
    Handler,
    TransactionClosedEvent,
    TransactionCreatedEvent,
};

type HookFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Default, Clone)]
pub struct EventProducers {
    pub transaction_created_producer: Vec<EventProducer<TransactionCreatedEvent>>,
    pub contribution_paid_producer: Vec<EventProducer<ContributionPaidEvent>>,
    pub transaction_closed_producer: Vec<EventProducer<TransactionClosedEvent>>,
}

pub struct EventHandlers {
    pub on_transaction_created: Option<EventHandler<TransactionCreatedEvent>>,
    pub on_contribution_paid: Option<EventHandler<ContributionPaidEvent>>,
    pub on_transaction_closed: Option<EventHandler<TransactionClosedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_transaction_created = hooks.on_transaction_created.map(|f| EventHandler::new(buffer_size, f));
        let on_contribution_paid = hooks.on_contribution_paid.map(|f| EventHandler::new(buffer_size, f));
        let on_transaction_closed = hooks.on_transaction_closed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_transaction_created, on_contribution_paid, on_transaction_closed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_transaction_created {
            result.transaction_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_contribution_paid {
            result.contribution_paid_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_transaction_closed {
            result.transaction_closed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_transaction_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_contribution_paid {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_transaction_closed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_transaction_created: Option<Handler<TransactionCreatedEvent>>,
    pub on_contribution_paid: Option<Handler<ContributionPaidEvent>>,
    pub on_transaction_closed: Option<Handler<TransactionClosedEvent>>,
}

impl EventHooks {
    pub fn on_transaction_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(TransactionCreatedEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_transaction_created = Some(Arc::new(f));
        self
    }

    pub fn on_contribution_paid<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ContributionPaidEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_contribution_paid = Some(Arc::new(f));
        self
    }

    pub fn on_transaction_closed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(TransactionClosedEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_transaction_closed = Some(Arc::new(f));
        self
    }
}
