//! Built-in service catalog for the Node platform.
//!
//! One constructor per service, assembling the descriptor from inline
//! fragment content. [`all_services`] is the single entry-point used by
//! [`super::InMemoryCatalog::with_builtin`]; [`base_bundle`] provides the
//! platform-wide files every generated project starts from.
//!
//! The shipped catalog is overlap-free by construction: no two descriptors
//! declare the same manifest dependency or local-dev config key (this is
//! asserted by the tests at the bottom of this module, and checked again at
//! runtime by `sprout validate`).

use sprout_core::domain::{
    Applicability, ApplicationType, BaseBundle, Platform, ServiceDescriptor,
};
use sprout_core::error::SproutResult;

// ── Public API ────────────────────────────────────────────────────────────────

/// Every built-in descriptor, sorted by name.
pub fn all_services() -> SproutResult<Vec<ServiceDescriptor>> {
    let mut services = vec![
        alert_notification()?,
        appid()?,
        cloud_object_storage()?,
        cloudant()?,
        db2()?,
        investment_portfolio()?,
        mongodb()?,
        postgre()?,
        push()?,
        redis()?,
        watson_conversation()?,
    ];
    services.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(services)
}

/// The platform-wide base bundle (Express skeleton).
pub fn base_bundle() -> BaseBundle {
    BaseBundle {
        package_manifest: PACKAGE_MANIFEST.to_string(),
        gitignore: GITIGNORE.to_string(),
        server: SERVER_JS.to_string(),
        service_manager: SERVICE_MANAGER_JS.to_string(),
    }
}

// ── Base bundle content ───────────────────────────────────────────────────────

const PACKAGE_MANIFEST: &str = r#"{
  "name": "{{PROJECT_NAME_KEBAB}}",
  "version": "1.0.0",
  "private": true,
  "scripts": {
    "start": "node server/server.js",
    "debug": "node --inspect=0.0.0.0:9229 server/server.js"
  },
  "dependencies": {
    "body-parser": "^1.18.3",
    "express": "^4.16.4",
    "log4js": "^3.0.6"
  }
}
"#;

const GITIGNORE: &str = "node_modules/
.DS_Store
server/localdev-config.json
";

const SERVER_JS: &str = "const express = require('express');
const bodyParser = require('body-parser');
const log4js = require('log4js');

const app = express();
const logger = log4js.getLogger('{{PROJECT_NAME_KEBAB}}');

app.use(bodyParser.json());
require('./services/index')(app);

const port = process.env.PORT || 3000;
app.listen(port, () => {
\tlogger.info(`{{PROJECT_NAME}} listening on http://localhost:${port}`);
});

module.exports = app;
";

const SERVICE_MANAGER_JS: &str = "const fs = require('fs');
const path = require('path');

// Resolves configuration values from the environment first, falling back to
// the local development config generated alongside this project.
class ServiceManager {
\tconstructor() {
\t\tthis.services = new Map();
\t\tthis.localConfig = {};
\t\tconst localDevConfig = path.join(__dirname, '..', 'localdev-config.json');
\t\tif (fs.existsSync(localDevConfig)) {
\t\t\tthis.localConfig = JSON.parse(fs.readFileSync(localDevConfig, 'utf8'));
\t\t}
\t}

\tconfig(key) {
\t\treturn process.env[key] || this.localConfig[key];
\t}

\tset(name, instance) {
\t\tthis.services.set(name, instance);
\t}

\tget(name) {
\t\treturn this.services.get(name);
\t}
}

module.exports = new ServiceManager();
";

// ── Service constructors ──────────────────────────────────────────────────────

/// App ID identity provider. Web applications only: microservices and
/// untyped applications never receive the auth instrumentation even when the
/// enabling key is present.
fn appid() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("appid")
        .payload_key("appid")
        .display_name("App ID")
        .description("Authentication and identity for web applications.")
        .dependency("ibmcloud-appid", "^6.0.0")
        .dependency("passport", "^0.4.0")
        .config_key("appid_tenantId", "tenantId")
        .config_key("appid_clientId", "clientId")
        .config_key("appid_secret", "secret")
        .config_key("appid_oauthServerUrl", "oauthServerUrl")
        .config_key("appid_profilesUrl", "profilesUrl")
        .instrumentation(
            "const passport = require('passport');
const { WebAppStrategy } = require('ibmcloud-appid');

module.exports = function(app, serviceManager) {
\tapp.use(passport.initialize());
\tpassport.use(new WebAppStrategy({
\t\ttenantId: serviceManager.config('appid_tenantId'),
\t\tclientId: serviceManager.config('appid_clientId'),
\t\tsecret: serviceManager.config('appid_secret'),
\t\toauthServerUrl: serviceManager.config('appid_oauthServerUrl'),
\t\tredirectUri: '/ibm/cloud/appid/callback'
\t}));
\tserviceManager.set('appid-passport', passport);
};
",
        )
        .readme(
            "# App ID

Adds authentication to the generated web application through the App ID
service. The passport strategy is registered during bootstrap; protect routes
with `passport.authenticate(WebAppStrategy.STRATEGY_NAME)`.

Local development credentials live in `server/localdev-config.json` under the
`appid_*` keys.
",
        )
        .applicability(
            Applicability::platform(Platform::Node)
                .with_application_types(vec![ApplicationType::Web]),
        )
        .build()?)
}

fn alert_notification() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("alert-notification")
        .payload_key("alertNotification")
        .display_name("Alert Notification")
        .description("Send and manage operational alerts.")
        .dependency("ibm-alert-notification", "^1.0.2")
        .config_key("alert_notification_url", "url")
        .config_key("alert_notification_name", "name")
        .config_key("alert_notification_password", "password")
        .instrumentation(
            "const AlertNotification = require('ibm-alert-notification');

module.exports = function(app, serviceManager) {
\tconst client = new AlertNotification({
\t\turl: serviceManager.config('alert_notification_url'),
\t\tname: serviceManager.config('alert_notification_name'),
\t\tpassword: serviceManager.config('alert_notification_password')
\t});
\tserviceManager.set('alert-notification', client);
};
",
        )
        .readme(
            "# Alert Notification

Wires an Alert Notification client into the service registry. Retrieve it
with `serviceManager.get('alert-notification')` to post alerts from your
application code.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

fn cloudant() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("cloudant")
        .payload_key("cloudant")
        .display_name("Cloudant")
        .description("Cloudant NoSQL document database.")
        .dependency("@cloudant/cloudant", "^2.4.1")
        .config_key("cloudant_username", "username")
        .config_key("cloudant_password", "password")
        .config_key("cloudant_url", "url")
        .instrumentation(
            "const Cloudant = require('@cloudant/cloudant');

module.exports = function(app, serviceManager) {
\tconst cloudant = Cloudant({
\t\taccount: serviceManager.config('cloudant_username'),
\t\tpassword: serviceManager.config('cloudant_password'),
\t\turl: serviceManager.config('cloudant_url')
\t});
\tserviceManager.set('cloudant', cloudant);
};
",
        )
        .readme(
            "# Cloudant

Connects the generated project to a Cloudant database. The client is
registered as `cloudant`; create a database handle with
`serviceManager.get('cloudant').db.use('mydb')`.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

fn cloud_object_storage() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("cloud-object-storage")
        .payload_key("cloudObjectStorage")
        .display_name("Cloud Object Storage")
        .description("S3-compatible object storage.")
        .dependency("ibm-cos-sdk", "^1.4.1")
        .config_key("cloud_object_storage_apikey", "apikey")
        .config_key("cloud_object_storage_endpoints", "endpoints")
        .config_key(
            "cloud_object_storage_iam_apikey_description",
            "iam_apikey_description",
        )
        .config_key("cloud_object_storage_iam_apikey_name", "iam_apikey_name")
        .config_key("cloud_object_storage_iam_role_crn", "iam_role_crn")
        .config_key(
            "cloud_object_storage_iam_serviceid_crn",
            "iam_serviceid_crn",
        )
        .config_key(
            "cloud_object_storage_resource_instance_id",
            "resource_instance_id",
        )
        .instrumentation(
            "const COS = require('ibm-cos-sdk');

module.exports = function(app, serviceManager) {
\tconst cos = new COS.S3({
\t\tendpoint: serviceManager.config('cloud_object_storage_endpoints'),
\t\tapiKeyId: serviceManager.config('cloud_object_storage_apikey'),
\t\tserviceInstanceId: serviceManager.config('cloud_object_storage_resource_instance_id')
\t});
\tserviceManager.set('cloud-object-storage', cos);
};
",
        )
        .readme(
            "# Cloud Object Storage

Registers an S3-compatible client as `cloud-object-storage`. Buckets are not
created automatically; provision them ahead of time or add a startup task.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

fn db2() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("db2")
        .payload_key("db2OnCloud")
        .display_name("Db2")
        .description("Db2 relational database.")
        .dependency("ibm_db", "^2.4.1")
        .config_key("db2_dsn", "dsn")
        .config_key("db2_ssljdbcurl", "ssljdbcurl")
        .instrumentation(
            "const ibmdb = require('ibm_db');

module.exports = function(app, serviceManager) {
\tconst dsn = serviceManager.config('db2_dsn');
\tserviceManager.set('db2', {
\t\tquery: function(sql, callback) {
\t\t\tibmdb.open(dsn, function(err, conn) {
\t\t\t\tif (err) { return callback(err); }
\t\t\t\tconn.query(sql, callback);
\t\t\t});
\t\t}
\t});
};
",
        )
        .readme(
            "# Db2

Registers a thin Db2 query helper as `db2`. The DSN comes from the
`db2_dsn` key; the SSL JDBC URL is exposed for JVM-based tooling that shares
the same configuration.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

/// Exercises nested parameter paths: the payload carries separate reader and
/// writer credential objects.
fn investment_portfolio() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("finance-investment-portfolio")
        .payload_key("investmentPortfolio")
        .display_name("Investment Portfolio")
        .description("Store and retrieve investment portfolios.")
        .dependency("request", "^2.88.0")
        .config_key("finance_investment_portfolio_url", "url")
        .config_key("finance_investment_portfolio_writer_userid", "writer.userid")
        .config_key(
            "finance_investment_portfolio_writer_password",
            "writer.password",
        )
        .config_key("finance_investment_portfolio_reader_userid", "reader.userid")
        .config_key(
            "finance_investment_portfolio_reader_password",
            "reader.password",
        )
        .instrumentation(
            "const request = require('request');

module.exports = function(app, serviceManager) {
\tconst baseUrl = serviceManager.config('finance_investment_portfolio_url');
\tserviceManager.set('investment-portfolio', {
\t\tlistPortfolios: function(callback) {
\t\t\trequest.get(`${baseUrl}/api/v1/portfolios`, {
\t\t\t\tauth: {
\t\t\t\t\tuser: serviceManager.config('finance_investment_portfolio_reader_userid'),
\t\t\t\t\tpass: serviceManager.config('finance_investment_portfolio_reader_password')
\t\t\t\t}
\t\t\t}, callback);
\t\t}
\t});
};
",
        )
        .readme(
            "# Investment Portfolio

Registers a small REST helper as `investment-portfolio`. Reader credentials
are used for queries; writer credentials are available under the
`finance_investment_portfolio_writer_*` keys for mutating calls.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

fn mongodb() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("mongodb")
        .payload_key("mongodb")
        .display_name("MongoDB")
        .description("MongoDB document database.")
        .dependency("mongodb", "^3.1.10")
        .config_key("mongodb_uri", "uri")
        .instrumentation(
            "const MongoClient = require('mongodb').MongoClient;

module.exports = function(app, serviceManager) {
\tconst uri = serviceManager.config('mongodb_uri');
\tMongoClient.connect(uri, { useNewUrlParser: true }, function(err, client) {
\t\tif (err) {
\t\t\tconsole.error('Failed to connect to MongoDB:', err.message);
\t\t\treturn;
\t\t}
\t\tserviceManager.set('mongodb', client);
\t});
};
",
        )
        .readme(
            "# MongoDB

Connects the generated project to MongoDB using the connection string in
`mongodb_uri`. The connected client is registered as `mongodb`.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

fn postgre() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("postgre")
        .payload_key("postgresql")
        .display_name("PostgreSQL")
        .description("PostgreSQL relational database.")
        .dependency("pg", "^7.6.1")
        .config_key("postgre_uri", "uri")
        .instrumentation(
            "const { Pool } = require('pg');

module.exports = function(app, serviceManager) {
\tconst pool = new Pool({
\t\tconnectionString: serviceManager.config('postgre_uri')
\t});
\tserviceManager.set('postgre', pool);
};
",
        )
        .readme(
            "# PostgreSQL

Creates a connection pool from `postgre_uri` and registers it as `postgre`.
Use `serviceManager.get('postgre').query(...)` from your routes.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

fn push() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("push")
        .payload_key("push")
        .display_name("Push Notifications")
        .description("Mobile and web push notifications.")
        .dependency("ibm-push-notifications", "^1.0.2")
        .config_key("push_appGuid", "appGuid")
        .config_key("push_apikey", "apikey")
        .config_key("push_clientSecret", "clientSecret")
        .instrumentation(
            "const PushNotifications = require('ibm-push-notifications').PushNotifications;

module.exports = function(app, serviceManager) {
\tconst push = new PushNotifications(
\t\tPushNotifications.Region.US_SOUTH,
\t\tserviceManager.config('push_appGuid'),
\t\tserviceManager.config('push_apikey')
\t);
\tserviceManager.set('push', push);
};
",
        )
        .readme(
            "# Push Notifications

Registers a push notification client as `push`. The client secret under
`push_clientSecret` is only needed by mobile SDK consumers and is surfaced in
the local-dev config for parity with the hosted binding.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

fn redis() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("redis")
        .payload_key("redis")
        .display_name("Redis")
        .description("Redis in-memory data store.")
        .dependency("redis", "^2.8.0")
        .config_key("redis_uri", "uri")
        .instrumentation(
            "const redis = require('redis');

module.exports = function(app, serviceManager) {
\tconst client = redis.createClient(serviceManager.config('redis_uri'));
\tclient.on('error', function(err) {
\t\tconsole.error('Redis error:', err.message);
\t});
\tserviceManager.set('redis', client);
};
",
        )
        .readme(
            "# Redis

Creates a Redis client from `redis_uri` and registers it as `redis`.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

fn watson_conversation() -> SproutResult<ServiceDescriptor> {
    Ok(ServiceDescriptor::builder()
        .name("watson-conversation")
        .payload_key("conversation")
        .display_name("Watson Conversation")
        .description("Conversational AI workspaces.")
        .dependency("watson-developer-cloud", "^3.13.0")
        .config_key("watson_conversation_url", "url")
        .config_key("watson_conversation_username", "username")
        .config_key("watson_conversation_password", "password")
        .instrumentation(
            "const AssistantV1 = require('watson-developer-cloud/assistant/v1');

module.exports = function(app, serviceManager) {
\tconst assistant = new AssistantV1({
\t\turl: serviceManager.config('watson_conversation_url'),
\t\tusername: serviceManager.config('watson_conversation_username'),
\t\tpassword: serviceManager.config('watson_conversation_password'),
\t\tversion: '2018-09-20'
\t});
\tserviceManager.set('watson-conversation', assistant);
};
",
        )
        .readme(
            "# Watson Conversation

Registers a Watson Assistant client as `watson-conversation`. Send a message
with `serviceManager.get('watson-conversation').message(...)`.
",
        )
        .applicability(Applicability::platform(Platform::Node))
        .build()?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::domain::validate_catalog;

    #[test]
    fn all_services_load_and_are_sorted() {
        let services = all_services().unwrap();
        assert_eq!(services.len(), 11);
        let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn shipped_catalog_is_overlap_free() {
        let services = all_services().unwrap();
        let warnings = validate_catalog(&services);
        assert!(warnings.is_empty(), "catalog overlaps: {warnings:?}");
    }

    #[test]
    fn every_service_validates() {
        for service in all_services().unwrap() {
            service.validate().unwrap_or_else(|e| {
                panic!("service '{}' failed validation: {e}", service.name)
            });
        }
    }

    #[test]
    fn appid_is_the_only_archetype_constrained_service() {
        for service in all_services().unwrap() {
            if service.name == "appid" {
                assert_eq!(
                    service.applicability.application_types,
                    Some(vec![ApplicationType::Web])
                );
            } else {
                assert_eq!(service.applicability.application_types, None);
            }
        }
    }

    #[test]
    fn every_service_ships_readme_and_instrumentation() {
        for service in all_services().unwrap() {
            assert!(
                !service.readme.is_empty(),
                "service '{}' has no readme",
                service.name
            );
            assert!(
                service.instrumentation.contains("module.exports"),
                "service '{}' instrumentation is not a module",
                service.name
            );
        }
    }

    #[test]
    fn nested_paths_only_where_params_nest() {
        let services = all_services().unwrap();
        let portfolio = services
            .iter()
            .find(|s| s.name == "finance-investment-portfolio")
            .unwrap();
        assert!(
            portfolio
                .config
                .iter()
                .any(|b| b.param_path == "writer.userid")
        );
    }

    #[test]
    fn base_bundle_references_localdev_config_in_gitignore() {
        let bundle = base_bundle();
        assert!(bundle.gitignore.contains("server/localdev-config.json"));
        assert!(bundle.package_manifest.contains("{{PROJECT_NAME_KEBAB}}"));
        assert!(bundle.service_manager.contains("localdev-config.json"));
    }
}
