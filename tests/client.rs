//! End-to-end tests over real HTTP against a mock Jenkins.

use std::sync::Arc;
use std::time::Duration;

use jenkins_client::{
    CallContext, ClientConfig, ErrorKind, JenkinsClient, JenkinsError, ReqwestTransport,
};
use mockito::{Matcher, Server};

const AUTH: &str = "Basic YWRtaW46c2VjcmV0";
const CRUMB: &str = r#"{"crumb": "c0ffee", "crumbRequestField": "Jenkins-Crumb"}"#;

fn client(server: &Server) -> JenkinsClient {
    JenkinsClient::new(&ClientConfig::new(server.url(), "admin", "secret")).unwrap()
}

#[tokio::test]
async fn test_root_info() {
    let mut server = Server::new_async().await;
    let root = server
        .mock("GET", "/api/json")
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"mode": "NORMAL", "useCrumbs": true, "jobs": [{"name": "demo", "url": "http://ci/job/demo/"}]}"#)
        .create_async()
        .await;

    let info = client(&server)
        .root_info(&CallContext::background())
        .await
        .unwrap();
    assert_eq!(info.mode, "NORMAL");
    assert!(info.job("demo").is_some());
    root.assert_async().await;
}

#[tokio::test]
async fn test_build_invoke_with_crumb() {
    let mut server = Server::new_async().await;
    let crumb = server
        .mock("GET", "/crumbIssuer/api/json")
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_body(CRUMB)
        .create_async()
        .await;
    let build = server
        .mock("POST", "/job/demo/build")
        .match_header("authorization", AUTH)
        .match_header("jenkins-crumb", "c0ffee")
        .with_status(201)
        .with_header("location", &format!("{}/queue/item/42/", server.url()))
        .create_async()
        .await;

    let invoked = client(&server)
        .build_invoke(&CallContext::background(), "demo")
        .await
        .unwrap();
    assert_eq!(invoked.queue_id, 42);

    crumb.assert_async().await;
    build.assert_async().await;
}

#[tokio::test]
async fn test_missing_crumb_field_skips_mutation() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/crumbIssuer/api/json")
        .with_status(200)
        .with_body(r#"{"crumb": "c0ffee"}"#)
        .create_async()
        .await;
    let build = server
        .mock("POST", "/job/demo/build")
        .expect(0)
        .create_async()
        .await;

    let err = client(&server)
        .build_invoke(&CallContext::background(), "demo")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Crumb);
    build.assert_async().await;
}

#[tokio::test]
async fn test_job_create_posts_config_xml() {
    let config_xml = "<project><description>demo</description></project>";

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/crumbIssuer/api/json")
        .with_status(200)
        .with_body(CRUMB)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/createItem")
        .match_query(Matcher::UrlEncoded("name".into(), "demo".into()))
        .match_header("content-type", "application/xml")
        .match_header("jenkins-crumb", "c0ffee")
        .match_body(config_xml)
        .with_status(200)
        .create_async()
        .await;
    let read = server
        .mock("GET", "/job/demo/api/json")
        .with_status(200)
        .with_body(r#"{"name": "demo", "description": "demo", "nextBuildNumber": 1}"#)
        .create_async()
        .await;

    let job = client(&server)
        .job_create(&CallContext::background(), "demo", config_xml)
        .await
        .unwrap();
    assert_eq!(job.description.as_deref(), Some("demo"));
    assert_eq!(job.next_build_number, 1);

    create.assert_async().await;
    read.assert_async().await;
}

#[tokio::test]
async fn test_build_by_queue_id() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/job/demo/api/json")
        .match_query(Matcher::UrlEncoded("tree".into(), "builds[id,queueId,url]".into()))
        .with_status(200)
        .with_body(r#"{"builds": [{"id": "3", "queueId": 17, "url": "http://ci/job/demo/3/"}]}"#)
        .create_async()
        .await;
    let build = server
        .mock("GET", "/job/demo/3/api/json")
        .with_status(200)
        .with_body(r#"{"number": 3, "queueId": 17, "result": "FAILURE", "building": false}"#)
        .create_async()
        .await;

    let found = client(&server)
        .build_get_by_queue_id(&CallContext::background(), "demo", 17)
        .await
        .unwrap();
    assert_eq!(found.number, 3);
    assert_eq!(found.result.as_deref(), Some("FAILURE"));

    list.assert_async().await;
    build.assert_async().await;
}

#[tokio::test]
async fn test_build_by_queue_id_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/job/demo/api/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"builds": []}"#)
        .create_async()
        .await;
    let follow_up = server
        .mock("GET", Matcher::Regex(r"^/job/demo/\d+/api/json$".to_string()))
        .expect(0)
        .create_async()
        .await;

    let err = client(&server)
        .build_get_by_queue_id(&CallContext::background(), "demo", 17)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    follow_up.assert_async().await;
}

#[tokio::test]
async fn test_redirect_to_other_host_keeps_auth() {
    let mut target = Server::new_async().await;
    let moved = target
        .mock("GET", "/jenkins/api/json")
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_body(r#"{"numExecutors": 3}"#)
        .create_async()
        .await;

    let mut origin = Server::new_async().await;
    origin
        .mock("GET", "/api/json")
        .with_status(302)
        .with_header("location", &format!("{}/jenkins/api/json", target.url()))
        .create_async()
        .await;

    let info = client(&origin)
        .root_info(&CallContext::background())
        .await
        .unwrap();
    assert_eq!(info.num_executors, 3);
    moved.assert_async().await;
}

#[tokio::test]
async fn test_session_cookie_is_replayed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/crumbIssuer/api/json")
        .with_status(200)
        .with_header("set-cookie", "JSESSIONID=node01; Path=/")
        .with_body(CRUMB)
        .create_async()
        .await;
    let delete = server
        .mock("POST", "/job/demo/doDelete")
        .match_header("cookie", Matcher::Regex("JSESSIONID=node01".to_string()))
        .match_header("jenkins-crumb", "c0ffee")
        .with_status(200)
        .create_async()
        .await;

    client(&server)
        .job_delete(&CallContext::background(), "demo")
        .await
        .unwrap();
    delete.assert_async().await;
}

#[tokio::test]
async fn test_plugin_install() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/crumbIssuer/api/json")
        .with_status(200)
        .with_body(CRUMB)
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/pluginManager/uploadPlugin")
        .match_header("content-type", "application/xml")
        .match_body(r#"<jenkins><install plugin="git@current" /></jenkins>"#)
        .with_status(200)
        .create_async()
        .await;

    client(&server)
        .plugin_install(&CallContext::background(), "git")
        .await
        .unwrap();
    upload.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_server() {
    let client =
        JenkinsClient::new(&ClientConfig::new("http://127.0.0.1:1", "admin", "secret")).unwrap();
    let err = client
        .root_info(&CallContext::background())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, JenkinsError::Transport(_) | JenkinsError::Timeout));
}

#[tokio::test]
async fn test_prebuilt_reqwest_client() {
    let mut server = Server::new_async().await;
    let root = server
        .mock("GET", "/api/json")
        .match_header("authorization", AUTH)
        .match_header("user-agent", "ci-bot/1.0")
        .with_status(200)
        .with_body(r#"{"numExecutors": 5}"#)
        .create_async()
        .await;

    let http = reqwest::Client::builder()
        .user_agent("ci-bot/1.0")
        .timeout(Duration::from_secs(5))
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let transport = Arc::new(ReqwestTransport::from_client(http));
    let config = ClientConfig::new(server.url(), "admin", "secret");
    let client = JenkinsClient::with_transport(&config, transport).unwrap();

    let info = client.root_info(&CallContext::background()).await.unwrap();
    assert_eq!(info.num_executors, 5);
    root.assert_async().await;
}
