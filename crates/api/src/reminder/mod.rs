pub mod check_reminders;
mod create_reminder;
mod delete_reminder;
mod get_reminders;

use actix_web::web;
use check_reminders::check_reminders_controller;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_reminders::get_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );

    cfg.route(
        "/cron/check-reminders",
        web::get().to(check_reminders_controller),
    );
}
