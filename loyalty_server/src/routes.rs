//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions. Async handlers get executed
//! concurrently by worker threads and thus don’t block execution.

use actix_web::{error::ResponseError, get, http::header, web, HttpResponse, Responder};
use log::*;
use loyalty_engine::{
    order_objects::{BalanceSummary, OrderSummary, WithdrawalSummary},
    traits::{AuthManagement, LedgerStore},
    AccountApi,
    AuthApi,
    OrderAdmission,
    OrderFlowApi,
    WithdrawalError,
};

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{JsonResponse, UserCredentials, WithdrawFailure, WithdrawRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Register  ----------------------------------------------------
route!(register => Post "/register" impl AuthManagement);
/// Route handler for the registration endpoint
///
/// Creates a new user from the `{login, password}` JSON body. On success the response is a 308
/// redirect to the login endpoint, so clients can immediately obtain an access token with the
/// same body. A taken login yields a 409.
pub async fn register<A>(
    body: web::Json<UserCredentials>,
    api: web::Data<AuthApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: AuthManagement,
{
    let UserCredentials { login, password } = body.into_inner();
    check_credential_format(&login, &password)?;
    trace!("💻️ Received registration request for [{login}]");
    api.register_user(&login, &password).await?;
    info!("💻️ New user [{login}] registered");
    Ok(HttpResponse::PermanentRedirect().insert_header((header::LOCATION, "/api/user/login")).finish())
}

//----------------------------------------------   Login  ----------------------------------------------------
route!(login => Post "/login" impl AuthManagement);
/// Route handler for the login endpoint
///
/// Verifies the `{login, password}` JSON body and, on success, issues a JWT access token in the
/// `Authorization` header of the response. All subsequent requests must echo that header back.
/// Wrong passwords and unknown logins are indistinguishable: both yield a 401.
pub async fn login<A>(
    body: web::Json<UserCredentials>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError>
where
    A: AuthManagement,
{
    let UserCredentials { login, password } = body.into_inner();
    check_credential_format(&login, &password)?;
    trace!("💻️ Received login request for [{login}]");
    let user = api.authenticate(&login, &password).await?;
    let access_token = signer.issue_token(&user.login)?;
    debug!("💻️ Issued access token for [{login}]");
    Ok(HttpResponse::Ok()
        .insert_header((header::AUTHORIZATION, format!("Bearer {access_token}")))
        .json(JsonResponse::success("logged in")))
}

fn check_credential_format(login: &str, password: &str) -> Result<(), ServerError> {
    if login.trim().is_empty() || password.is_empty() {
        return Err(ServerError::InvalidRequestBody("login and password must not be empty".to_string()));
    }
    Ok(())
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(submit_order => Post "/orders" impl LedgerStore);
/// Route handler for order submission
///
/// The body is the bare order number as plain text. Admission is idempotent per owner:
/// * a new number is queued for accrual and yields a 202,
/// * a number the same user already uploaded yields a 200,
/// * a number another user owns yields a 409,
/// * a number failing the checksum yields a 422.
pub async fn submit_order<B>(
    claims: JwtClaims,
    body: String,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: LedgerStore,
{
    let number = body.trim();
    debug!("💻️ POST order {number} for [{}]", claims.sub);
    match api.submit_order(&claims.sub, number).await? {
        OrderAdmission::Accepted(order) => {
            Ok(HttpResponse::Accepted().json(JsonResponse::success(format!("order {} accepted", order.number))))
        },
        OrderAdmission::AlreadyUploaded(order) => {
            Ok(HttpResponse::Ok().json(JsonResponse::success(format!("order {} was already uploaded", order.number))))
        },
        OrderAdmission::OwnedByAnotherUser => Err(ServerError::OrderOwnedByAnotherUser),
    }
}

route!(my_orders => Get "/orders" impl LedgerStore);
/// Route handler for the order history endpoint
///
/// Authenticated users fetch their own uploaded orders, newest first. An empty history yields a
/// 204 with no body rather than an empty array.
pub async fn my_orders<B>(claims: JwtClaims, api: web::Data<OrderFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: LedgerStore {
    debug!("💻️ GET my_orders for [{}]", claims.sub);
    let orders = api.orders_for_user(&claims.sub).await?;
    if orders.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let summaries = orders.into_iter().map(OrderSummary::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(summaries))
}

//----------------------------------------------   Balance  ----------------------------------------------------
route!(my_balance => Get "/balance" impl LedgerStore);
/// Route handler for the balance endpoint
///
/// Returns the spendable balance and the lifetime withdrawn total for the account associated
/// with the access token.
pub async fn my_balance<B>(claims: JwtClaims, api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError>
where B: LedgerStore {
    debug!("💻️ GET my_balance for [{}]", claims.sub);
    let balance = api.balance(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(BalanceSummary::from(balance)))
}

//----------------------------------------------   Withdrawals  ----------------------------------------------------
route!(withdraw => Post "/balance/withdraw" impl LedgerStore);
/// Route handler for withdrawals
///
/// Debits `sum` points against the caller-supplied order reference. The sufficiency check is
/// atomic in the ledger, so a burst of concurrent requests can never jointly overdraw the
/// account; the unlucky ones receive a 402. Refused and failed withdrawals carry a
/// `{message, status}` body; validation failures use the common error body.
pub async fn withdraw<B>(
    claims: JwtClaims,
    body: web::Json<WithdrawRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: LedgerStore,
{
    let WithdrawRequest { order, sum } = body.into_inner();
    debug!("💻️ POST withdrawal of {sum} against {order} for [{}]", claims.sub);
    let withdrawal = match api.withdraw(&claims.sub, &order, sum).await {
        Ok(w) => w,
        Err(e @ (WithdrawalError::InsufficientFunds | WithdrawalError::LedgerError(_))) => {
            let err = ServerError::from(e);
            let status = err.status_code();
            debug!("💻️ Withdrawal against {order} for [{}] refused: {err}", claims.sub);
            return Ok(HttpResponse::build(status).json(WithdrawFailure::new(err, status.as_u16())));
        },
        Err(e) => return Err(e.into()),
    };
    Ok(HttpResponse::Ok()
        .json(JsonResponse::success(format!("{} points withdrawn against {}", withdrawal.amount, withdrawal.order_ref))))
}

route!(my_withdrawals => Get "/withdrawals" impl LedgerStore);
/// Route handler for the withdrawal history endpoint
///
/// Returns the user's withdrawals, oldest first. As with the order history, an empty result
/// yields a 204.
pub async fn my_withdrawals<B>(claims: JwtClaims, api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError>
where B: LedgerStore {
    debug!("💻️ GET my_withdrawals for [{}]", claims.sub);
    let withdrawals = api.withdrawals(&claims.sub).await?;
    if withdrawals.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let summaries = withdrawals.into_iter().map(WithdrawalSummary::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(summaries))
}
