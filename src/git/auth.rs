//! Credential callbacks backed by git's native credential system

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

const SSH_KEY_NAMES: &[&str] = &["id_ed25519", "id_ecdsa", "id_rsa"];

fn auth_error(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_key_from_disk(username: &str) -> Result<Cred, Error> {
    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");

    SSH_KEY_NAMES
        .iter()
        .map(|name| (ssh_dir.join(name), ssh_dir.join(format!("{name}.pub"))))
        .filter(|(private, _)| private.exists())
        .find_map(|(private, public)| {
            let public = public.exists().then_some(public);
            Cred::ssh_key(username, public.as_deref(), &private, None).ok()
        })
        .ok_or_else(|| auth_error("no usable SSH key found in ~/.ssh"))
}

fn userpass(url: &str, username: Option<&str>) -> Result<Cred, Error> {
    if let Ok(config) = git2::Config::open_default() {
        if let Ok(cred) = Cred::credential_helper(&config, url, username) {
            return Ok(cred);
        }
    }
    // Anonymous access lets public HTTPS remotes answer with their real error
    Cred::userpass_plaintext(username.unwrap_or(""), "")
}

/// Register credential callbacks on `callbacks`
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed| {
        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            let username = username_from_url.unwrap_or("git");
            return Cred::ssh_key_from_agent(username).or_else(|_| ssh_key_from_disk(username));
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return userpass(url, username_from_url);
        }

        Err(auth_error("authentication failed"))
    });
}
