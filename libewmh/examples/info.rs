use libewmh::prelude::*;

fn main() {
    let wm = WindowManager::connect().unwrap();
    let charset = Charset::detect(false);
    println!("X11 Information");
    println!("-----------------------------------------------------------------------");
    println!("Root Window:       {:#010x}", wm.root());
    println!("Screen:            {}", wm.screen());
    println!("WM Window:         {:#010x}", wm.supporting_wm().unwrap_or(0));
    println!("Desktops:          {}", wm.desktops().unwrap_or(0));
    println!("UTF-8:             {}", charset.is_utf8());
    println!();
    println!("{:<10} {:<3} {:<6} {}", "ID", "DSK", "PID", "NAME");
    println!("{:-<72}", "");
    for win in wm.client_list().unwrap() {
        let desktop = wm.win_desktop(win).map(|x| x.to_string()).unwrap_or_else(|| "-".to_owned());
        let pid = wm.win_pid(win).map(|x| x.to_string()).unwrap_or_else(|| "-".to_owned());
        let name = libewmh::window::window_title(&wm, &charset, win).unwrap_or_default();
        println!("{:#010x} {:<3} {:<6} {}", win, desktop, pid, name);
    }
}
