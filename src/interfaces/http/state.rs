use crate::application::events::{PaymentEventHandler, PrecheckoutPolicy};
use crate::application::fulfillment::FulfillmentDispatcher;
use crate::application::invoice::InvoiceIssuer;
use crate::domain::ports::{
    DeliveryChannelRef, PaymentGatewayRef, PendingStoreRef, ReadingOracleRef,
};
use std::sync::Arc;

/// Shared application state wired into every handler.
pub struct AppState {
    pub store: PendingStoreRef,
    pub gateway: PaymentGatewayRef,
    pub channel: DeliveryChannelRef,
    pub issuer: InvoiceIssuer,
    pub events: PaymentEventHandler,
    pub dispatcher: Arc<FulfillmentDispatcher>,
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(
        store: PendingStoreRef,
        gateway: PaymentGatewayRef,
        channel: DeliveryChannelRef,
        oracle: ReadingOracleRef,
        policy: PrecheckoutPolicy,
        public_url: Option<String>,
    ) -> Arc<Self> {
        let issuer = InvoiceIssuer::new(store.clone(), gateway.clone());
        let dispatcher = Arc::new(FulfillmentDispatcher::new(oracle, channel.clone()));
        let events = PaymentEventHandler::new(
            store.clone(),
            gateway.clone(),
            channel.clone(),
            dispatcher.clone(),
            policy,
        );
        Arc::new(Self {
            store,
            gateway,
            channel,
            issuer,
            events,
            dispatcher,
            public_url,
        })
    }
}
