use aws_config::{BehaviorVersion, Region};
use exercises_api_lambda::adapters::dynamodb::DynamoDbExerciseTable;
use exercises_api_lambda::adapters::s3::S3LinkSigner;
use exercises_api_lambda::config::ExerciseApiConfig;
use exercises_api_lambda::handlers::exercises::{handle_exercises_event, ExerciseDependencies};
use exercises_api_lambda::handlers::response::ApiGatewayResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    config: ExerciseApiConfig,
    table: DynamoDbExerciseTable,
    signer: S3LinkSigner,
}

impl RuntimeDependencies {
    async fn load() -> Result<Self, Error> {
        let config = ExerciseApiConfig::from_env().map_err(|error| Error::from(error.to_string()))?;

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        tracing::info!(
            component = "exercises_lambda",
            event = "config_loaded",
            region = config.region.as_str(),
            table = config.table_name.as_str(),
            bucket = config.bucket_name.as_str(),
            link_ttl_minutes = config.link_ttl.minutes(),
            signing_failure_policy = config.signing_failure_policy.as_str()
        );

        Ok(Self {
            table: DynamoDbExerciseTable::new(
                aws_sdk_dynamodb::Client::new(&aws_config),
                config.table_name.clone(),
            ),
            signer: S3LinkSigner::new(
                aws_sdk_s3::Client::new(&aws_config),
                config.bucket_name.clone(),
            ),
            config,
        })
    }

    fn handler_dependencies(&self) -> ExerciseDependencies<'_> {
        ExerciseDependencies {
            table: &self.table,
            signer: &self.signer,
            link_ttl: self.config.link_ttl,
            signing_failure_policy: self.config.signing_failure_policy,
        }
    }
}

async fn handle_request(
    deps: &RuntimeDependencies,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    let request_id = event.context.request_id.clone();
    Ok(handle_exercises_event(
        &event.payload,
        &request_id,
        &deps.handler_dependencies(),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let deps = RuntimeDependencies::load().await?;
    let deps = &deps;
    lambda_runtime::run(service_fn(move |event| handle_request(deps, event))).await
}
