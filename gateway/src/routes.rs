//! Gateway route table
//!
//! Binds upstream gRPC methods to HTTP routes on a [`Gateway`].

use http::Method;
use proto::{GreetRequest, GreeterServiceClient};
use tonic::transport::Channel;

use crate::codec::JsonCodec;
use crate::dispatcher::Gateway;
use crate::endpoint::{make_handler_with, CallContext, EncodePolicy};

/// Route serving `greeter.GreeterService/Greet`
pub const GREET_PATH: &str = "/";

/// Register `POST /` as a JSON front for `GreeterService/Greet`
pub fn register_greeter(
    gateway: &Gateway,
    client: GreeterServiceClient<Channel>,
    policy: EncodePolicy,
) {
    gateway.register_endpoint(
        Method::POST,
        GREET_PATH,
        make_handler_with(
            move |ctx: CallContext, request: GreetRequest| {
                let mut client = client.clone();
                async move {
                    client
                        .greet(ctx.into_request(request))
                        .await
                        .map(tonic::Response::into_inner)
                }
            },
            JsonCodec::decode::<GreetRequest>,
            policy,
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_greeter_route() {
        let gateway = Gateway::new();
        let channel = Channel::from_static("http://127.0.0.1:1").connect_lazy();

        register_greeter(&gateway, GreeterServiceClient::new(channel), EncodePolicy::Strict);

        assert_eq!(
            gateway.registry().routes(),
            vec![("POST".to_string(), "/".to_string())]
        );
    }
}
