//! Field tables for each notifier.
use super::{Field, FieldKind, NotifierSchema};
use crate::contact_point::NotifierType;

const fn string(tf_key: &'static str, gf_key: &'static str) -> Field {
    Field::new(tf_key, gf_key, FieldKind::String)
}

const fn boolean(tf_key: &'static str, gf_key: &'static str) -> Field {
    Field::new(tf_key, gf_key, FieldKind::Bool)
}

const fn integer(tf_key: &'static str, gf_key: &'static str) -> Field {
    Field::new(tf_key, gf_key, FieldKind::Integer)
}

const fn integer_string(tf_key: &'static str, gf_key: &'static str) -> Field {
    Field::new(tf_key, gf_key, FieldKind::IntegerString)
}

const fn object(tf_key: &'static str, gf_key: &'static str) -> Field {
    Field::new(tf_key, gf_key, FieldKind::Object)
}

// Webhooks and Grafana OnCall share the same settings.
const WEBHOOK_FIELDS: &[Field] = &[
    string("url", "url").required(),
    string("http_method", "httpMethod"),
    string("basic_auth_user", "username"),
    string("basic_auth_password", "password"),
    string("authorization_scheme", "authorization_scheme"),
    string("authorization_credentials", "authorization_credentials"),
    integer("max_alerts", "maxAlerts"),
    string("message", "message"),
    string("title", "title"),
];

pub(super) static SCHEMAS: &[NotifierSchema] = &[
    NotifierSchema {
        field: "discord",
        notifier_type: NotifierType::Discord,
        secure_fields: &["url"],
        fields: &[
            string("url", "url").required(),
            string("title", "title"),
            string("message", "message"),
            string("avatar_url", "avatar_url"),
            boolean("use_discord_username", "use_discord_username"),
        ],
    },
    NotifierSchema {
        field: "email",
        notifier_type: NotifierType::Email,
        secure_fields: &[],
        fields: &[
            Field::new("addresses", "addresses", FieldKind::Addresses).required(),
            boolean("single_email", "singleEmail"),
            string("message", "message"),
            string("subject", "subject"),
        ],
    },
    NotifierSchema {
        field: "googlechat",
        notifier_type: NotifierType::GoogleChat,
        secure_fields: &["url"],
        fields: &[
            string("url", "url").required(),
            string("title", "title"),
            string("message", "message"),
        ],
    },
    NotifierSchema {
        field: "oncall",
        notifier_type: NotifierType::OnCall,
        secure_fields: &["basic_auth_password", "authorization_credentials"],
        fields: WEBHOOK_FIELDS,
    },
    NotifierSchema {
        field: "opsgenie",
        notifier_type: NotifierType::Opsgenie,
        secure_fields: &["api_key"],
        fields: &[
            string("url", "apiUrl"),
            string("api_key", "apiKey").required(),
            string("message", "message"),
            string("description", "description"),
            boolean("auto_close", "autoClose"),
            boolean("override_priority", "overridePriority"),
            string("send_tags_as", "sendTagsAs"),
            object("responders", "responders"),
        ],
    },
    NotifierSchema {
        field: "pagerduty",
        notifier_type: NotifierType::PagerDuty,
        secure_fields: &["integration_key"],
        fields: &[
            string("integration_key", "integrationKey").required(),
            string("severity", "severity"),
            string("class", "class"),
            string("component", "component"),
            string("group", "group"),
            string("summary", "summary"),
            string("source", "source"),
            string("client", "client"),
            string("client_url", "client_url"),
            object("details", "details"),
            string("url", "url"),
        ],
    },
    NotifierSchema {
        field: "pushover",
        notifier_type: NotifierType::Pushover,
        secure_fields: &["user_key", "api_token"],
        fields: &[
            string("user_key", "userKey").required(),
            string("api_token", "apiToken").required(),
            integer_string("priority", "priority"),
            integer_string("ok_priority", "okPriority"),
            integer_string("retry", "retry"),
            integer_string("expire", "expire"),
            string("device", "device"),
            string("sound", "sound"),
            string("ok_sound", "okSound"),
            string("title", "title"),
            string("message", "message"),
            boolean("upload_image", "uploadImage"),
        ],
    },
    NotifierSchema {
        field: "slack",
        notifier_type: NotifierType::Slack,
        secure_fields: &["url", "token"],
        fields: &[
            string("endpoint_url", "endpointUrl"),
            string("url", "url"),
            string("token", "token"),
            string("recipient", "recipient"),
            string("text", "text"),
            string("title", "title"),
            string("username", "username"),
            string("icon_emoji", "icon_emoji"),
            string("icon_url", "icon_url"),
            string("mention_channel", "mentionChannel"),
            string("mention_users", "mentionUsers"),
            string("mention_groups", "mentionGroups"),
            string("color", "color"),
        ],
    },
    NotifierSchema {
        field: "sns",
        notifier_type: NotifierType::Sns,
        secure_fields: &["access_key", "secret_key"],
        fields: &[
            string("topic", "topic").required(),
            string("auth_provider", "authProvider"),
            string("access_key", "accessKey"),
            string("secret_key", "secretKey"),
            string("assume_role_arn", "assumeRoleARN"),
            string("message_format", "messageFormat"),
            string("body", "body"),
            string("subject", "subject"),
            string("external_id", "externalId"),
        ],
    },
    NotifierSchema {
        field: "teams",
        notifier_type: NotifierType::Teams,
        secure_fields: &["url"],
        fields: &[
            string("url", "url").required(),
            string("message", "message"),
            string("title", "title"),
            string("section_title", "sectiontitle"),
        ],
    },
    NotifierSchema {
        field: "telegram",
        notifier_type: NotifierType::Telegram,
        secure_fields: &["token"],
        fields: &[
            string("token", "bottoken").required(),
            string("chat_id", "chatid").required(),
            string("message_thread_id", "message_thread_id"),
            string("message", "message"),
            string("parse_mode", "parse_mode"),
            boolean("disable_web_page_preview", "disable_web_page_preview"),
            boolean("protect_content", "protect_content"),
            boolean("disable_notifications", "disable_notifications"),
        ],
    },
    NotifierSchema {
        field: "victorops",
        notifier_type: NotifierType::VictorOps,
        secure_fields: &["url"],
        fields: &[
            string("url", "url").required(),
            string("message_type", "messageType"),
            string("title", "title"),
            string("description", "description"),
        ],
    },
    NotifierSchema {
        field: "webex",
        notifier_type: NotifierType::Webex,
        secure_fields: &["token"],
        fields: &[
            string("token", "bot_token"),
            string("api_url", "api_url"),
            string("message", "message"),
            string("room_id", "room_id"),
        ],
    },
    NotifierSchema {
        field: "webhook",
        notifier_type: NotifierType::Webhook,
        secure_fields: &["basic_auth_password", "authorization_credentials"],
        fields: WEBHOOK_FIELDS,
    },
    NotifierSchema {
        field: "wecom",
        notifier_type: NotifierType::WeCom,
        secure_fields: &["url", "secret"],
        fields: &[
            string("url", "url"),
            string("message", "message"),
            string("title", "title"),
            string("secret", "secret"),
            string("corp_id", "corp_id"),
            string("agent_id", "agent_id"),
            string("msg_type", "msgtype"),
            string("to_user", "touser"),
        ],
    },
];
