fn main() -> anyhow::Result<()> {
    reminder_list_lib::run()
}
