use std::io;

use dysms::{Credentials, DysmsClient, DysmsError, SendSms};
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let access_key_id = required_env("DYSMS_ACCESS_KEY_ID")?;
    let access_key_secret = required_env("DYSMS_ACCESS_KEY_SECRET")?;
    let phones = required_env("DYSMS_PHONE")?;
    let sign_name = required_env("DYSMS_SIGN_NAME")?;
    let template_code = required_env("DYSMS_TEMPLATE_CODE")?;
    let template_param =
        std::env::var("DYSMS_TEMPLATE_PARAM").unwrap_or_else(|_| r#"{"code":"123456"}"#.to_owned());

    let client = DysmsClient::new(Credentials::new(access_key_id, access_key_secret))?;
    let request = SendSms::new(phones, sign_name, template_code, template_param);

    match client.send_sms(request).await {
        Ok(response) => {
            println!(
                "send sms succeeded: request_id: {:?}, biz_id: {:?}",
                response.request_id, response.biz_id
            );
            Ok(())
        }
        Err(DysmsError::Api { code, message, .. }) => {
            println!("send sms failed: {code} {message:?}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
