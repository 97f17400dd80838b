fn main() {
    leptos::mount::mount_to_body(feederdash_dashboard::App);
}
